//! Telegram transport: turns updates into dialog events and sends replies back

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use crate::command::Command;
use crate::dialog::{Event, PickerBot};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Check the token against Telegram, then poll updates until Ctrl-C.
///
/// Updates from one user are handled strictly in order; different users are
/// handled concurrently.
pub async fn run(bot: Bot, picker: PickerBot) -> Result<()> {
    let me = bot.get_me().await?;
    info!("Authorized as @{}", me.username());
    bot.set_my_commands(Command::bot_commands()).await?;

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![picker])
        .distribution_function(|update: &Update| update.from().map(|user| user.id))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn command_handler(bot: Bot, msg: Message, cmd: Command, picker: PickerBot) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    debug!("Command {:?} from user {}", cmd, user.id.0);

    let replies = picker.handle(user.id, Event::Command(cmd)).await;
    send_replies(&bot, msg.chat.id, replies).await
}

async fn message_handler(bot: Bot, msg: Message, picker: PickerBot) -> HandlerResult {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };

    // Unknown or malformed commands never answer a prompt
    if text.starts_with('/') {
        debug!("Ignoring unrecognized command {:?} from user {}", text, user.id.0);
        return Ok(());
    }

    let replies = picker.handle(user.id, Event::Text(text.to_string())).await;
    send_replies(&bot, msg.chat.id, replies).await
}

async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<String>) -> HandlerResult {
    for text in replies {
        bot.send_message(chat_id, text).await?;
    }
    Ok(())
}
