//! Application wiring: routes, middleware stack, and request handlers.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error};

use crate::http::{Request, Response, StatusCode};
use crate::middleware::{AccessLog, MiddlewareHandler, Next, from_middleware};
use crate::predict::Predictor;
use crate::router::Router;

// The browser client, compiled into the binary so deployment is one file.
const INDEX_HTML: &str = include_str!("../web/index.html");

#[derive(Debug, Deserialize)]
struct PredictBody {
    #[serde(default)]
    phrase: String,
}

/// The assembled HTTP application: middleware stack plus routing table.
///
/// `App` is constructed once at startup and shared across connection tasks;
/// [`App::handle`] is the entry point the server dispatches every parsed
/// request to.
pub struct App {
    middlewares: Vec<MiddlewareHandler>,
    router: Arc<Router>,
}

impl App {
    /// Builds the application around a configured [`Predictor`].
    pub fn new(predictor: Arc<Predictor>) -> Self {
        let mut router = Router::new();

        router.get("/", |_req| async { Response::html(INDEX_HTML) });

        let provider_name = predictor.provider().name.clone();
        let model = predictor.provider().model.clone();
        router.get("/healthz", move |_req| {
            let provider = provider_name.clone();
            let model = model.clone();
            async move {
                Response::json(
                    StatusCode::Ok,
                    &serde_json::json!({
                        "status": "ok",
                        "provider": provider,
                        "model": model,
                    }),
                )
            }
        });

        let p = Arc::clone(&predictor);
        router.post("/predict", move |req| {
            let predictor = Arc::clone(&p);
            async move { predict_handler(predictor, req).await }
        });

        Self {
            middlewares: vec![from_middleware(Arc::new(AccessLog))],
            router: Arc::new(router),
        }
    }

    /// Runs `request` through the middleware chain into the router.
    pub async fn handle(&self, request: Request) -> Response {
        let router = Arc::clone(&self.router);
        let mut chain = self.middlewares.clone();
        chain.push(Arc::new(move |req, _next| {
            let router = Arc::clone(&router);
            Box::pin(async move { router.route(req).await })
        }));

        Next::new(chain).run(request).await
    }
}

/// `POST /predict`: deserialize the phrase, run the prediction pipeline,
/// and map the outcome onto the response contract.
async fn predict_handler(predictor: Arc<Predictor>, request: Request) -> Response {
    let body: PredictBody = match request.json() {
        Ok(body) => body,
        Err(err) => {
            debug!(error = %err, "request body carried no phrase");
            return error_response(StatusCode::BadRequest, "No phrase provided");
        }
    };

    match predictor.predict(&body.phrase).await {
        Ok(result) => Response::json(StatusCode::Ok, &serde_json::json!({ "response": result })),
        Err(err) => {
            if err.status() == StatusCode::BadRequest {
                debug!(error = %err, "rejected prediction request");
            } else {
                error!(error = %err, phrase = %body.phrase, "prediction failed");
            }
            error_response(err.status(), &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    Response::json(status, &serde_json::json!({ "error": message }))
}
