//! User-facing reply texts

pub const START: &str = "Добро пожаловать в Letterboxd Watchlist Picker Bot! 🎬\n\n\
    Я помогу выбрать случайный фильм из вашего Watchlist или из любого публичного списка.\n\n\
    Чтобы начать, установите свое имя пользователя Letterboxd с помощью команды /set_username\n\n\
    Для справки используйте /help";

pub const HELP: &str = "Список доступных команд:\n\n\
    /start - Начать работу с ботом\n\
    /help - Показать справку по командам\n\
    /cancel - Отменить текущую команду\n\
    /set_username - Установить имя пользователя Letterboxd\n\
    /random - Получить случайный фильм из вашего Watchlist\n\
    /random_n - Получить N случайных фильмов (где N от 1 до 10)\n\
    /list - Получить случайный фильм из публичного списка\n";

pub const CANCELLED: &str = "Команда отменена. Вы можете начать заново.";

pub const ASK_USERNAME: &str = "Введите ваше имя пользователя Letterboxd.";
pub const ASK_LIST_OWNER: &str = "Введите имя пользователя Letterboxd, чей список вы хотите просмотреть.";
pub const ASK_RANDOM_COUNT: &str = "Введите количество рандомных фильмов (от 1 до 10).";

pub const USERNAME_REQUIRED: &str =
    "Сначала установите имя пользователя Letterboxd с помощью команды /set_username.";
pub const INVALID_COUNT: &str =
    "Пожалуйста, введите корректное число (целое положительное число).";
pub const WATCHLIST_EMPTY: &str = "Ваш Watchlist пуст или не содержит фильмов.";

pub fn username_set(username: &str) -> String {
    format!("Имя пользователя Letterboxd установлено: {username}")
}

pub fn list_owner_set(owner: &str) -> String {
    format!("Имя держателя списка установлено: {owner}\nТеперь введите название публичного списка.")
}

pub fn list_unavailable(owner: &str, list_label: &str) -> String {
    format!(
        "Не удалось получить список фильмов. Возможные причины:\n\
         - Пользователь '{owner}' не найден\n\
         - Список '{list_label}' не существует\n\
         - Список является приватным"
    )
}

pub fn list_empty(owner: &str, list_label: &str) -> String {
    format!("Список '{list_label}' пользователя '{owner}' пуст или не содержит фильмов.")
}

pub fn watchlist_unavailable(username: &str) -> String {
    format!(
        "Не удалось получить watchlist. Возможные причины:\n\
         - Пользователь '{username}' не найден\n\
         - Watchlist является приватным"
    )
}
