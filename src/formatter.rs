//! Rendering picked films into a chat reply

use crate::models::Film;
use crate::traits::WATCHLIST;

/// Render picked films as one message.
///
/// `list_label` is the list name as the user typed it; the literal
/// `watchlist` switches to watchlist phrasing. `films` must not be empty.
pub fn format_films(films: &[Film], list_label: &str, username: &str) -> String {
    let is_watchlist = list_label == WATCHLIST;

    if let [film] = films {
        let header = if is_watchlist {
            "Рандомный фильм из вашего Watchlist:".to_string()
        } else {
            format!("Рандомный фильм из списка '{list_label}' пользователя {username}:")
        };
        return format!("{header}\n\n{}\n{}", film.display_title(), film.url);
    }

    let mut result = if is_watchlist {
        "Рандомные фильмы из вашего Watchlist:\n\n".to_string()
    } else {
        format!("Рандомные фильмы из списка '{list_label}' пользователя {username}:\n\n")
    };

    for (i, film) in films.iter().enumerate() {
        result.push_str(&format!("{}. {}\n{}\n\n", i + 1, film.display_title(), film.url));
    }

    result.trim_end_matches("\n\n").to_string()
}
