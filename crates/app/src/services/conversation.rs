use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use billing::{BillingError, CostClient, reshape_rows};
use completion::{CompletionClient, CompletionError};
use costbot_core::{CostReport, DateRange, parse_date_range, render_prompt};

use crate::error::{AppError, Result};

/// Fixed reply when a new human member joins a conversation.
pub const WELCOME_TEXT: &str =
    "Welcome to the Azure Subscription Cost Chatbot! Ask me about Azure costs.";

/// Fixed reply when the message is not a well-formed date range.
pub const GUIDANCE_TEXT: &str = "Please enter dates in the format 'YYYY-MM-DD to YYYY-MM-DD'.";

/// Fixed reply when the billing query or payload reshape fails.
pub const COST_FAILURE_TEXT: &str =
    "Sorry, I couldn't retrieve cost data right now. Please try again later.";

/// Fixed reply when the completion call fails or returns nothing.
pub const SUMMARY_FAILURE_TEXT: &str =
    "Sorry, I couldn't generate a summary right now. Please try again later.";

/// Daily per-resource-group costs for one range.
#[async_trait]
pub trait CostSource: Send + Sync {
    async fn daily_costs(&self, range: &DateRange) -> std::result::Result<CostReport, BillingError>;
}

/// Natural-language summary for one prompt.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> std::result::Result<String, CompletionError>;
}

#[async_trait]
impl CostSource for CostClient {
    async fn daily_costs(&self, range: &DateRange) -> std::result::Result<CostReport, BillingError> {
        let rows = self.query(range).await?;
        Ok(reshape_rows(&rows)?)
    }
}

#[async_trait]
impl Summarizer for CompletionClient {
    async fn summarize(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        self.complete(prompt).await
    }
}

/// The fixed welcome for a `memberJoined` event, or `None` when the joined
/// member is the bot itself.
pub fn welcome_reply(member_id: &str, bot_id: &str) -> Option<&'static str> {
    (member_id != bot_id).then_some(WELCOME_TEXT)
}

/// Stateless per-turn pipeline: parse range, fetch costs, reshape, build
/// prompt, summarize. Nothing is retained between turns.
#[derive(Clone)]
pub struct ConversationService {
    costs: Arc<dyn CostSource>,
    summarizer: Arc<dyn Summarizer>,
}

impl ConversationService {
    pub fn new(costs: Arc<dyn CostSource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { costs, summarizer }
    }

    /// Run one `messageReceived` turn and always produce a reply: the summary
    /// on success, otherwise the stable message for the failure class.
    pub async fn handle_message(&self, text: &str) -> String {
        match self.run_turn(text).await {
            Ok(summary) => summary,
            Err(err @ AppError::Parse(_)) => {
                debug!(error = %err, "rejected message text");
                err.user_message().to_string()
            }
            Err(err) => {
                warn!(error = %err, "turn failed");
                err.user_message().to_string()
            }
        }
    }

    async fn run_turn(&self, text: &str) -> Result<String> {
        let range = parse_date_range(text)?;
        let report = self.costs.daily_costs(&range).await?;
        debug!(rows = report.len(), "fetched cost report");
        let prompt = render_prompt(&range, &report);
        let summary = self.summarizer.summarize(&prompt).await?;
        Ok(summary)
    }
}
