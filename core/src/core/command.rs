use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::core::embed::Embed;

/// What a command hands back to the host for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "lowercase")]
pub enum CommandReply {
    Text(String),
    Embed(Embed),
}

impl CommandReply {
    pub fn text(msg: impl Into<String>) -> Self {
        CommandReply::Text(msg.into())
    }

    pub fn as_embed(&self) -> Option<&Embed> {
        match self {
            CommandReply::Embed(e) => Some(e),
            CommandReply::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CommandReply::Text(t) => Some(t),
            CommandReply::Embed(_) => None,
        }
    }
}

/// A chat command the host can register and dispatch.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    fn description(&self) -> &str;

    /// Usage template; `{c}` stands for the command name.
    fn usage_template(&self) -> &str {
        "{c}"
    }

    fn usage(&self) -> String {
        self.usage_template().replace("{c}", self.name())
    }

    async fn execute(&self, args: &[String]) -> CommandReply;
}

pub type HandlerRef = Arc<dyn CommandHandler>;

/// Name/alias lookup table standing in for the host's command API.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, HandlerRef>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its name and aliases. A handler already
    /// registered under the same name is replaced.
    pub fn register(&mut self, handler: HandlerRef) {
        let name = handler.name().to_string();
        self.unregister(&name);

        for alias in handler.aliases() {
            self.aliases.insert(alias.to_string(), name.clone());
        }
        debug!("Registered command '{}'", name);
        self.commands.insert(name, handler);
    }

    /// Removes a command and its aliases. Returns whether it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        if self.commands.remove(name).is_none() {
            return false;
        }
        self.aliases.retain(|_, target| target != name);
        debug!("Unregistered command '{}'", name);
        true
    }

    /// Looks a handler up by name, falling back to the alias table.
    pub fn resolve(&self, name_or_alias: &str) -> Option<HandlerRef> {
        let name = self
            .aliases
            .get(name_or_alias)
            .map(String::as_str)
            .unwrap_or(name_or_alias);
        self.commands.get(name).cloned()
    }

    /// Runs the resolved handler. Unknown commands are an error, not a reply.
    pub async fn dispatch(
        &self,
        name_or_alias: &str,
        args: &[String],
    ) -> anyhow::Result<CommandReply> {
        let handler = self
            .resolve(name_or_alias)
            .ok_or_else(|| anyhow::anyhow!("unknown command '{}'", name_or_alias))?;
        Ok(handler.execute(args).await)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands; aliases are not counted.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        name: &'static str,
    }

    #[async_trait]
    impl CommandHandler for Echo {
        fn name(&self) -> &str {
            self.name
        }

        fn aliases(&self) -> &[&str] {
            &["say"]
        }

        fn description(&self) -> &str {
            "Echoes its arguments."
        }

        fn usage_template(&self) -> &str {
            "{c} <text>"
        }

        async fn execute(&self, args: &[String]) -> CommandReply {
            CommandReply::text(format!("{}:{}", self.name, args.join(" ")))
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_dispatch_by_name_and_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Echo { name: "echo" }));

        let reply = registry.dispatch("echo", &args(&["hi"])).await.unwrap();
        assert_eq!(reply.as_text(), Some("echo:hi"));

        let reply = registry.dispatch("say", &args(&["there"])).await.unwrap();
        assert_eq!(reply.as_text(), Some("echo:there"));
    }

    #[tokio::test]
    async fn test_unknown_command_errors() {
        let registry = CommandRegistry::new();
        assert!(registry.dispatch("nope", &[]).await.is_err());
    }

    #[test]
    fn test_unregister_drops_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Echo { name: "echo" }));
        assert!(registry.resolve("say").is_some());

        assert!(registry.unregister("echo"));
        assert!(registry.resolve("echo").is_none());
        assert!(registry.resolve("say").is_none());
        assert!(registry.is_empty());
        assert!(!registry.unregister("echo"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Echo { name: "echo" }));
        registry.register(Arc::new(Echo { name: "echo" }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[test]
    fn test_usage_substitutes_name() {
        let echo = Echo { name: "echo" };
        assert_eq!(echo.usage(), "echo <text>");
    }

    #[test]
    fn test_reply_serializes_tagged() {
        let json = serde_json::to_value(CommandReply::text("hello")).unwrap();
        assert_eq!(json["kind"], "text");
        assert_eq!(json["result"], "hello");
    }
}
