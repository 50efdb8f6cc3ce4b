//! Direct-message conversations and product Q&A posting.
//!
//! Chats live in a single `chats` slot: every mutation is a read-modify-write
//! of the whole collection, like everything else in the store. A conversation
//! is created on first contact between two users and only ever grows by
//! message append.

use chrono::Utc;
use tracing::{debug, info};

use dropshop_shared::{
    ChatId, ChatMessage, ChatSession, MessageId, Product, ProductId, ProductMessage, User, UserId,
};
use dropshop_store::Store;

use crate::error::{ClientError, Result};

/// All conversations the given user takes part in.
pub fn sessions_for(store: &Store, user: UserId) -> Result<Vec<ChatSession>> {
    let mut chats = store.chats()?;
    chats.retain(|c| c.has_participant(&user));
    Ok(chats)
}

/// The conversation between two users, created on first contact.
///
/// `product_id` is only recorded when the session is newly created; an
/// existing conversation between the pair is reused as-is.
pub fn open_session(
    store: &Store,
    a: UserId,
    b: UserId,
    product_id: Option<ProductId>,
) -> Result<ChatSession> {
    let mut chats = store.chats()?;

    if let Some(existing) = chats
        .iter()
        .find(|c| c.has_participant(&a) && c.has_participant(&b))
    {
        return Ok(existing.clone());
    }

    let session = ChatSession {
        id: ChatId::new(),
        participants: [a, b],
        product_id,
        messages: Vec::new(),
        last_updated: Utc::now(),
    };

    chats.push(session.clone());
    store.save_chats(&chats)?;
    info!(chat = %session.id, "conversation started");
    Ok(session)
}

/// Append a message to a conversation and bump its last-updated timestamp.
///
/// Messages are immutable once appended. A message must carry text or an
/// image; sending into an unknown session is a silent no-op, consistent with
/// the missing-entity policy of the rest of the system.
pub fn send_message(
    store: &Store,
    chat_id: ChatId,
    sender: UserId,
    text: Option<String>,
    image_url: Option<String>,
) -> Result<ChatMessage> {
    if text.as_deref().map_or(true, str::is_empty) && image_url.is_none() {
        return Err(ClientError::EmptyMessage);
    }

    let message = ChatMessage {
        id: MessageId::new(),
        sender_id: sender,
        text,
        image_url,
        timestamp: Utc::now(),
    };

    let mut chats = store.chats()?;
    if let Some(session) = chats.iter_mut().find(|c| c.id == chat_id) {
        session.messages.push(message.clone());
        session.last_updated = message.timestamp;
        store.save_chats(&chats)?;
        debug!(chat = %chat_id, msg = %message.id, "message sent");
    } else {
        debug!(chat = %chat_id, "message to unknown session dropped");
    }

    Ok(message)
}

/// Post into a product's public Q&A log.
///
/// The sender's name and avatar are snapshotted onto the message, and the
/// seller flag is derived from the listing. Persistence and the
/// `NEW_PRODUCT_MSG` broadcast both happen inside the store append.
pub fn post_product_message(
    store: &Store,
    product: &Product,
    sender: &User,
    text: String,
) -> Result<ProductMessage> {
    let message = ProductMessage {
        id: MessageId::new(),
        product_id: product.id,
        sender_id: sender.id,
        sender_name: sender.name.clone(),
        sender_avatar: sender.avatar.clone(),
        text,
        timestamp: Utc::now(),
        is_seller: sender.id == product.seller_id,
    };

    store.save_product_message(&message)?;
    Ok(message)
}
