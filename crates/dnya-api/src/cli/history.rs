//! `dnya history`: print a stored conversation.

use anyhow::Result;
use console::style;

use dnya_core::chat::repository::MessageRepository;
use dnya_types::chat::Message;

/// Print `user_id`'s conversation, oldest first.
pub async fn show_history(
    repo: &impl MessageRepository,
    user_id: &str,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let messages = match limit {
        Some(limit) => repo.recent_messages(user_id, limit as usize).await?,
        None => repo.conversation(user_id).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  No messages for '{user_id}'.");
        println!();
        return Ok(());
    }

    println!();
    for message in &messages {
        println!("{}", render_line(message));
    }
    println!();
    println!(
        "  {}",
        style(format!("{} message(s)", messages.len())).dim()
    );
    Ok(())
}

fn render_line(message: &Message) -> String {
    let time = message.timestamp.format("%Y-%m-%d %H:%M:%S");
    let speaker = if message.is_from_assistant() {
        style("Dnya").magenta().bold()
    } else {
        style("You ").cyan().bold()
    };
    format!("  {} {} {}", style(time).dim(), speaker, message.content)
}
