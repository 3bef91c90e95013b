// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: DB/filesystem/session-token adapters
// - presentation: HTTP handlers, extractors and routing
// - application: ports, use cases and the error taxonomy
// - domain: core models and field validation
// - client: pure helpers shared with the browser client

pub mod application;
pub mod bootstrap;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
