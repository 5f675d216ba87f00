pub mod conversation;

pub use conversation::ConversationService;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub conversation: ConversationService,
}
