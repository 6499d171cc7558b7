//! # nextword
//!
//! A small web backend that predicts the next words of a phrase by calling
//! an OpenAI-compatible chat completion provider, then sanitizing the
//! model's free-form reply into a guaranteed JSON shape.
//!
//! The HTTP layer is built from scratch on Tokio: a hand-rolled HTTP/1.1
//! parser and response writer ([`http`]), an exact-match router
//! ([`router`]), and a composable middleware chain ([`middleware`]). The
//! prediction pipeline lives in [`predict`]; the provider client in [`llm`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nextword::app::App;
//! use nextword::config::Config;
//! use nextword::llm::ChatClient;
//! use nextword::predict::Predictor;
//! use nextword::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ChatClient::new(&config.provider)?;
//!     let predictor = Arc::new(Predictor::new(Arc::new(client), config.provider));
//!     let app = Arc::new(App::new(predictor));
//!
//!     let server = Server::bind(config.listen_addr.to_string()).await?;
//!     server
//!         .run(move |req| {
//!             let app = Arc::clone(&app);
//!             async move { app.handle(req).await }
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod http;
pub mod llm;
pub mod middleware;
pub mod predict;
pub mod router;
pub mod server;

pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
pub use server::{Server, ServerError};
