use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::core::command::{CommandHandler, CommandRegistry, CommandReply};
use crate::core::report::build_embed;
use crate::modules::sitecheck::{CheckOutcome, SiteCheckClient};

pub const COMMAND_NAME: &str = "checksite";
pub const COMMAND_ALIASES: &[&str] = &["checkurl"];

pub const MSG_MISSING_SITE: &str = "Provide site to check.";
pub const MSG_FAILED: &str = "Something went wrong :(";

/// `checksite <site>`: looks the site up on SiteCheck and replies with an embed.
pub struct SiteCheckCommand {
    client: Arc<SiteCheckClient>,
}

impl SiteCheckCommand {
    pub fn new(client: Arc<SiteCheckClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommandHandler for SiteCheckCommand {
    fn name(&self) -> &str {
        COMMAND_NAME
    }

    fn aliases(&self) -> &[&str] {
        COMMAND_ALIASES
    }

    fn description(&self) -> &str {
        "Checks website security via sitecheck.sucuri.net."
    }

    fn usage_template(&self) -> &str {
        "{c} <site>"
    }

    async fn execute(&self, args: &[String]) -> CommandReply {
        let site = match args.first().filter(|s| !s.is_empty()) {
            Some(site) => site,
            None => return CommandReply::text(MSG_MISSING_SITE),
        };

        match self.client.check(site).await {
            Ok(CheckOutcome::Report(resp)) => CommandReply::Embed(build_embed(&resp)),
            Ok(CheckOutcome::ScanError(msg)) => CommandReply::Text(msg),
            Ok(CheckOutcome::Failed(_)) => CommandReply::text(MSG_FAILED),
            Err(e) => {
                warn!("SiteCheck lookup for {} failed: {:#}", site, e);
                CommandReply::text(MSG_FAILED)
            }
        }
    }
}

/// Host lifecycle glue: registers the command on start, removes it on unload.
pub struct SiteCheckPlugin {
    client: Arc<SiteCheckClient>,
}

impl SiteCheckPlugin {
    pub fn new(client: Arc<SiteCheckClient>) -> Self {
        Self { client }
    }

    pub fn start(&self, registry: &mut CommandRegistry) {
        registry.register(Arc::new(SiteCheckCommand::new(Arc::clone(&self.client))));
        info!("sitecheck plugin started");
    }

    pub fn unload(&self, registry: &mut CommandRegistry) {
        registry.unregister(COMMAND_NAME);
        info!("sitecheck plugin unloaded");
    }
}
