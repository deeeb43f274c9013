//! Message formatting utilities for client display.

use yoriai_server::infrastructure::dto::http::ParticipantsDto;
use yoriai_shared::time::timestamp_to_jst_hm;

use crate::{domain::ConnectionState, error::ClientError};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a relayed chat message
    ///
    /// # Arguments
    ///
    /// * `sender` - Display name of the sender
    /// * `message` - The message body
    /// * `sent_at` - Unix timestamp when the message was sent (milliseconds)
    pub fn format_chat_message(sender: &str, message: &str, sent_at: i64) -> String {
        format!("\n[{}] {}: {}\n", Self::clock(sent_at), sender, message)
    }

    /// Format the local echo of a message we sent
    pub fn format_own_message(message: &str, sent_at: i64) -> String {
        format!("[{}] (me): {}\n", Self::clock(sent_at), message)
    }

    /// Format a disconnect notice
    pub fn format_disconnect_notice(message: &str, disconnected_at: i64) -> String {
        format!("\n- {} at {}\n", message, Self::clock(disconnected_at))
    }

    pub fn format_join_success(username: &str) -> String {
        format!(
            "\nJoined as '{}'. Type messages and press Enter to send. /users lists the room, /status shows the connection, /exit leaves.\n",
            username
        )
    }

    pub fn format_join_error(message: &str) -> String {
        format!("\nCould not join: {}\nEnter another display name.\n", message)
    }

    /// Ask for a display name when none has been accepted yet
    pub fn format_name_request() -> String {
        "Enter a display name to join the chat.\n".to_string()
    }

    /// Format the participant list returned by `/users`
    ///
    /// # Arguments
    ///
    /// * `participants` - Response of the participants endpoint
    /// * `me` - The name this client joined under, marked as "(me)"
    pub fn format_participants(participants: &ParticipantsDto, me: Option<&str>) -> String {
        let mut output = String::new();
        output.push_str(&format!("Participants ({}):\n", participants.count));

        if participants.participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for participant in &participants.participants {
                let me_suffix = if Some(participant.username.as_str()) == me {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!(
                    "  {}{} - joined at {}\n",
                    participant.username, me_suffix, participant.joined_at
                ));
            }
        }

        output
    }

    pub fn format_status(state: &ConnectionState) -> String {
        format!("Status: {}\n", state)
    }

    /// Format a locally rejected request
    pub fn format_error(error: &ClientError) -> String {
        format!("! {}\n", error)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    // 古いサーバーはタイムスタンプを送らない
    fn clock(timestamp_millis: i64) -> String {
        if timestamp_millis > 0 {
            timestamp_to_jst_hm(timestamp_millis)
        } else {
            "--:--".to_string()
        }
    }
}
