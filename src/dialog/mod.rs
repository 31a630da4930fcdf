//! Per-user conversation handling.
//!
//! Every inbound event is either a recognized command or free text. Free text
//! answers the user's pending prompt, if there is one; commands never do. A
//! command received mid-dialog leaves the pending prompt in place unless the
//! command opens a prompt of its own.

pub mod messages;
pub mod state;

use std::sync::Arc;

use teloxide::types::UserId;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::formatter::format_films;
use crate::models::Film;
use crate::picker::FilmPicker;
use crate::scrapers::letterboxd::normalize_username;
use crate::traits::{FilmSource, WATCHLIST};

pub use state::{DialogState, SessionStore, UserState};

/// Upper bound for `/random_n`
pub const MAX_RANDOM_FILMS: usize = 10;

/// An inbound chat event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Text(String),
}

/// The conversation state machine.
///
/// Owns the session store; the film source and picker are only ever called
/// with explicit arguments.
#[derive(Clone)]
pub struct PickerBot {
    source: Arc<dyn FilmSource>,
    picker: Arc<dyn FilmPicker>,
    sessions: SessionStore,
}

impl PickerBot {
    pub fn new(source: Arc<dyn FilmSource>, picker: Arc<dyn FilmPicker>) -> Self {
        Self {
            source,
            picker,
            sessions: SessionStore::new(),
        }
    }

    /// Process one event from `user` and return the replies to send, in order
    pub async fn handle(&self, user: UserId, event: Event) -> Vec<String> {
        let session = self.sessions.get_or_create(user).await;
        let mut state = session.lock().await;

        let reply = match event {
            Event::Command(command) => Some(self.handle_command(&mut state, command).await),
            Event::Text(text) => self.handle_answer(&mut state, &text).await,
        };

        if reply.is_none() {
            debug!("Ignoring stray text from user {}", user.0);
        }
        debug!("User {} is now in {:?}", user.0, state.dialog);

        reply.into_iter().collect()
    }

    async fn handle_command(&self, state: &mut UserState, command: Command) -> String {
        match command {
            Command::Start => messages::START.to_string(),
            Command::Help => messages::HELP.to_string(),
            Command::Cancel => {
                state.reset_dialog();
                messages::CANCELLED.to_string()
            }
            Command::SetUsername(handle) if !handle.trim().is_empty() => {
                state.reset_dialog();
                Self::save_username(state, &handle)
            }
            Command::SetUsername(_) => {
                state.dialog = DialogState::AwaitingUsername;
                messages::ASK_USERNAME.to_string()
            }
            Command::List => {
                state.dialog = DialogState::AwaitingListOwner;
                messages::ASK_LIST_OWNER.to_string()
            }
            Command::RandomN => {
                if state.username.is_none() {
                    messages::USERNAME_REQUIRED.to_string()
                } else {
                    state.dialog = DialogState::AwaitingRandomCount;
                    messages::ASK_RANDOM_COUNT.to_string()
                }
            }
            Command::Random => match state.username.clone() {
                Some(username) => self.pick_from_watchlist(&username, 1).await,
                None => messages::USERNAME_REQUIRED.to_string(),
            },
        }
    }

    /// Treat `text` as the answer to the pending prompt; `None` when idle
    async fn handle_answer(&self, state: &mut UserState, text: &str) -> Option<String> {
        let reply = match std::mem::take(&mut state.dialog) {
            DialogState::Idle => return None,
            DialogState::AwaitingUsername => Self::save_username(state, text),
            DialogState::AwaitingListOwner => {
                let owner = normalize_username(text);
                let reply = messages::list_owner_set(&owner);
                state.dialog = DialogState::AwaitingListName { owner };
                reply
            }
            DialogState::AwaitingListName { owner } => {
                self.pick_from_list(&owner, text.trim()).await
            }
            DialogState::AwaitingRandomCount => match (parse_count(text), state.username.clone()) {
                (None, _) => messages::INVALID_COUNT.to_string(),
                (Some(_), None) => messages::USERNAME_REQUIRED.to_string(),
                (Some(count), Some(username)) => self.pick_from_watchlist(&username, count).await,
            },
        };

        Some(reply)
    }

    fn save_username(state: &mut UserState, text: &str) -> String {
        let username = normalize_username(text);
        let reply = messages::username_set(&username);
        state.username = Some(username).filter(|name| !name.is_empty());
        info!("Letterboxd handle set to {:?}", state.username);
        reply
    }

    fn pick(&self, films: Vec<Film>, count: usize) -> Vec<Film> {
        let total = films.len();
        let picked = self.picker.pick(films, count);
        let ids: Vec<&str> = picked.iter().map(|film| film.id.as_str()).collect();
        debug!("Picked {:?} out of {} films", ids, total);
        picked
    }

    async fn pick_from_watchlist(&self, username: &str, count: usize) -> String {
        match self.source.fetch_watchlist(username).await {
            Err(e) => {
                warn!(url = ?e.url(), "Failed to fetch watchlist of {}: {}", username, e);
                messages::watchlist_unavailable(username)
            }
            Ok(films) if films.is_empty() => messages::WATCHLIST_EMPTY.to_string(),
            Ok(films) => format_films(&self.pick(films, count), WATCHLIST, username),
        }
    }

    async fn pick_from_list(&self, owner: &str, list_label: &str) -> String {
        match self.source.fetch_list(owner, list_label).await {
            Err(e) => {
                warn!(url = ?e.url(), "Failed to fetch list '{}' of {}: {}", list_label, owner, e);
                messages::list_unavailable(owner, list_label)
            }
            Ok(films) if films.is_empty() => messages::list_empty(owner, list_label),
            Ok(films) => format_films(&self.pick(films, 1), list_label, owner),
        }
    }
}

/// Parse a `/random_n` answer: a positive integer, capped at [`MAX_RANDOM_FILMS`]
fn parse_count(text: &str) -> Option<usize> {
    let count: i64 = text.trim().parse().ok()?;
    if count < 1 {
        return None;
    }
    Some(usize::try_from(count).map_or(MAX_RANDOM_FILMS, |c| c.min(MAX_RANDOM_FILMS)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::error::FetchError;
    use crate::picker::SeededPicker;
    use crate::scrapers::letterboxd::normalize_list_name;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    enum Outcome {
        Films(Vec<Film>),
        Fail,
    }

    /// Film source returning a fixed outcome and recording its calls
    struct StubSource {
        outcome: Outcome,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubSource {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FilmSource for StubSource {
        async fn fetch_list(&self, username: &str, list: &str) -> Result<Vec<Film>, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((normalize_username(username), normalize_list_name(list)));
            match &self.outcome {
                Outcome::Films(films) => Ok(films.clone()),
                Outcome::Fail => Err(FetchError::Unreachable {
                    url: "https://letterboxd.com/".to_string(),
                    reason: "timed out".to_string(),
                }),
            }
        }
    }

    fn films(n: usize) -> Vec<Film> {
        (0..n)
            .map(|i| Film {
                id: i.to_string(),
                title: format!("Film {i}"),
                year: "2000".to_string(),
                url: format!("https://x/{i}"),
            })
            .collect()
    }

    fn bot(source: Arc<StubSource>) -> PickerBot {
        PickerBot::new(source, Arc::new(SeededPicker::new(7)))
    }

    async fn say(bot: &PickerBot, user: UserId, text: &str) -> Vec<String> {
        bot.handle(user, Event::Text(text.to_string())).await
    }

    async fn run(bot: &PickerBot, user: UserId, command: Command) -> Vec<String> {
        bot.handle(user, Event::Command(command)).await
    }

    async fn dialog_of(bot: &PickerBot, user: UserId) -> DialogState {
        bot.sessions.snapshot(user).await.unwrap_or_default().dialog
    }

    #[tokio::test]
    async fn set_username_inline_then_random_pick() {
        let source = StubSource::new(Outcome::Films(vec![Film {
            id: "1".to_string(),
            title: "Dune".to_string(),
            year: "2021".to_string(),
            url: "https://x/dune".to_string(),
        }]));
        let bot = bot(source.clone());

        let replies = run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;
        assert_eq!(replies, vec!["Имя пользователя Letterboxd установлено: alice"]);

        let replies = run(&bot, ALICE, Command::Random).await;
        assert_eq!(
            replies,
            vec!["Рандомный фильм из вашего Watchlist:\n\nDune (2021)\nhttps://x/dune"]
        );
        assert_eq!(source.calls(), vec![("alice".to_string(), "watchlist".to_string())]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn set_username_prompt_normalizes_answer() {
        let bot = bot(StubSource::new(Outcome::Films(Vec::new())));

        assert_eq!(
            run(&bot, ALICE, Command::SetUsername(String::new())).await,
            vec![messages::ASK_USERNAME]
        );
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::AwaitingUsername);

        assert_eq!(
            say(&bot, ALICE, "  Alice ").await,
            vec!["Имя пользователя Letterboxd установлено: alice"]
        );
        let state = bot.sessions.snapshot(ALICE).await.unwrap();
        assert_eq!(state.username.as_deref(), Some("alice"));
        assert_eq!(state.dialog, DialogState::Idle);
    }

    #[tokio::test]
    async fn random_requires_username() {
        let source = StubSource::new(Outcome::Films(films(3)));
        let bot = bot(source.clone());

        assert_eq!(run(&bot, ALICE, Command::Random).await, vec![messages::USERNAME_REQUIRED]);
        assert_eq!(run(&bot, ALICE, Command::RandomN).await, vec![messages::USERNAME_REQUIRED]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn random_n_is_capped_at_ten() {
        let source = StubSource::new(Outcome::Films(films(20)));
        let bot = bot(source.clone());
        run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;

        assert_eq!(run(&bot, ALICE, Command::RandomN).await, vec![messages::ASK_RANDOM_COUNT]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::AwaitingRandomCount);

        let replies = say(&bot, ALICE, "15").await;
        assert_eq!(replies.len(), 1);
        let reply = &replies[0];
        assert!(reply.starts_with("Рандомные фильмы из вашего Watchlist:"));
        assert!(reply.contains("\n10. "));
        assert!(!reply.contains("\n11. "));
        assert_eq!(reply.matches("https://x/").count(), 10);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn random_n_rejects_non_positive_and_garbage() {
        let source = StubSource::new(Outcome::Films(films(20)));
        let bot = bot(source.clone());
        run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;

        for answer in ["0", "-3", "ten", ""] {
            run(&bot, ALICE, Command::RandomN).await;
            assert_eq!(say(&bot, ALICE, answer).await, vec![messages::INVALID_COUNT]);
            assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn list_dialog_with_empty_list() {
        let source = StubSource::new(Outcome::Films(Vec::new()));
        let bot = bot(source.clone());

        assert_eq!(run(&bot, ALICE, Command::List).await, vec![messages::ASK_LIST_OWNER]);
        assert_eq!(
            say(&bot, ALICE, "bob").await,
            vec!["Имя держателя списка установлено: bob\nТеперь введите название публичного списка."]
        );
        assert_eq!(
            dialog_of(&bot, ALICE).await,
            DialogState::AwaitingListName {
                owner: "bob".to_string()
            }
        );

        assert_eq!(
            say(&bot, ALICE, "Top 10").await,
            vec!["Список 'Top 10' пользователя 'bob' пуст или не содержит фильмов."]
        );
        assert_eq!(source.calls(), vec![("bob".to_string(), "top-10".to_string())]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn list_dialog_picks_one_film() {
        let bot = bot(StubSource::new(Outcome::Films(films(5))));

        run(&bot, ALICE, Command::List).await;
        say(&bot, ALICE, "Bob").await;
        let replies = say(&bot, ALICE, "Sci Fi").await;

        assert_eq!(replies.len(), 1);
        assert!(replies[0].starts_with("Рандомный фильм из списка 'Sci Fi' пользователя bob:\n\n"));
        assert_eq!(replies[0].matches("https://x/").count(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_lists_possible_causes() {
        let bot = bot(StubSource::new(Outcome::Fail));

        run(&bot, ALICE, Command::List).await;
        say(&bot, ALICE, "bob").await;
        assert_eq!(
            say(&bot, ALICE, "Hidden Gems").await,
            vec![messages::list_unavailable("bob", "Hidden Gems")]
        );
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);

        run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;
        assert_eq!(
            run(&bot, ALICE, Command::Random).await,
            vec![messages::watchlist_unavailable("alice")]
        );
    }

    #[tokio::test]
    async fn empty_watchlist_has_its_own_message() {
        let bot = bot(StubSource::new(Outcome::Films(Vec::new())));
        run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;

        assert_eq!(run(&bot, ALICE, Command::Random).await, vec![messages::WATCHLIST_EMPTY]);
    }

    #[tokio::test]
    async fn cancel_discards_pending_prompt() {
        let source = StubSource::new(Outcome::Films(films(3)));
        let bot = bot(source.clone());

        run(&bot, ALICE, Command::List).await;
        say(&bot, ALICE, "bob").await;

        assert_eq!(run(&bot, ALICE, Command::Cancel).await, vec![messages::CANCELLED]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);

        assert!(say(&bot, ALICE, "Top 10").await.is_empty());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn cancel_resets_every_prompt() {
        let source = StubSource::new(Outcome::Films(films(3)));
        let bot = bot(source.clone());
        run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;

        let openers = [
            (Command::SetUsername(String::new()), DialogState::AwaitingUsername),
            (Command::List, DialogState::AwaitingListOwner),
            (Command::RandomN, DialogState::AwaitingRandomCount),
        ];

        for (opener, pending) in openers {
            for answer in ["5", "x"] {
                run(&bot, ALICE, opener.clone()).await;
                assert_eq!(dialog_of(&bot, ALICE).await, pending);

                assert_eq!(run(&bot, ALICE, Command::Cancel).await, vec![messages::CANCELLED]);
                assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);

                assert!(say(&bot, ALICE, answer).await.is_empty());
            }
        }

        let state = bot.sessions.snapshot(ALICE).await.unwrap();
        assert_eq!(state.username.as_deref(), Some("alice"));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn cancel_works_for_unseen_user() {
        let bot = bot(StubSource::new(Outcome::Films(Vec::new())));
        assert_eq!(run(&bot, BOB, Command::Cancel).await, vec![messages::CANCELLED]);
    }

    #[tokio::test]
    async fn stray_text_is_ignored() {
        let bot = bot(StubSource::new(Outcome::Films(Vec::new())));
        assert!(say(&bot, ALICE, "hello").await.is_empty());
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn command_mid_dialog_leaves_prompt_pending() {
        let bot = bot(StubSource::new(Outcome::Films(Vec::new())));

        run(&bot, ALICE, Command::SetUsername(String::new())).await;
        assert_eq!(run(&bot, ALICE, Command::Help).await, vec![messages::HELP]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::AwaitingUsername);

        // The next text still answers the earlier prompt
        assert_eq!(
            say(&bot, ALICE, "carol").await,
            vec!["Имя пользователя Letterboxd установлено: carol"]
        );
    }

    #[tokio::test]
    async fn users_do_not_share_state() {
        let bot = bot(StubSource::new(Outcome::Films(films(2))));

        run(&bot, ALICE, Command::SetUsername("alice".to_string())).await;
        run(&bot, ALICE, Command::List).await;

        assert!(say(&bot, BOB, "bob").await.is_empty());
        assert_eq!(run(&bot, BOB, Command::Random).await, vec![messages::USERNAME_REQUIRED]);
        assert_eq!(dialog_of(&bot, ALICE).await, DialogState::AwaitingListOwner);
    }

    #[test]
    fn count_parsing() {
        assert_eq!(parse_count(" 3 "), Some(3));
        assert_eq!(parse_count("10"), Some(10));
        assert_eq!(parse_count("11"), Some(MAX_RANDOM_FILMS));
        assert_eq!(parse_count("99999999999"), Some(MAX_RANDOM_FILMS));
        assert_eq!(parse_count("0"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("2.5"), None);
    }
}
