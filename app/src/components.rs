//! Demo components
//!
//! A minimal graph showing the three resolution paths: convention lookup
//! (`greeting_service`), tag decoding (`app_name`), and a capability binding
//! (`formatter`), plus an init hook that runs once every field is set.

use std::sync::Arc;

use armature::Injectable;

/// The role a controller needs for rendering output.
pub trait Formatter: Send + Sync {
    fn format(&self, text: &str) -> String;
}

/// Renders text unchanged.
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Renders text in capitals.
pub struct ShoutingFormatter;

impl Formatter for ShoutingFormatter {
    fn format(&self, text: &str) -> String {
        text.to_uppercase()
    }
}

#[derive(Default, Clone, Injectable)]
pub struct GreetingService {
    pub greeting: String,
}

#[derive(Default, Injectable)]
#[inject(init(GreetingService, dyn Formatter))]
pub struct GreetController {
    /// The role this controller fills, and the rendering dependency itself.
    #[inject(embedded)]
    formatter: Option<Arc<dyn Formatter>>,
    #[inject(tag(value = "${app.name:anonymous}"))]
    app_name: Option<Arc<String>>,
    greeting_service: Option<Arc<GreetingService>>,
    banner: String,
}

impl GreetController {
    fn init(&mut self, service: Arc<GreetingService>, formatter: Arc<dyn Formatter>) {
        self.banner = formatter.format(&service.greeting);
    }

    pub fn greet(&self) -> String {
        let name = self
            .app_name
            .as_ref()
            .map(|name| name.as_str())
            .unwrap_or("anonymous");
        format!("[{name}] {}", self.banner)
    }
}
