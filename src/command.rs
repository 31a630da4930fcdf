use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case")]
pub enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать справку по командам")]
    Help,
    #[command(description = "отменить текущую команду")]
    Cancel,
    #[command(rename = "set_username", description = "установить имя пользователя Letterboxd")]
    SetUsername(String),
    #[command(description = "получить случайный фильм из вашего Watchlist")]
    Random,
    #[command(rename = "random_n", description = "получить N случайных фильмов (N от 1 до 10)")]
    RandomN,
    #[command(description = "получить случайный фильм из публичного списка")]
    List,
}
