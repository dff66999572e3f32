//! Request dispatch — one handler per named operation, all stateless over
//! the two datasets.

use serde_json::json;
use uuid::Uuid;

use sd_pipeline::{AskOrigin, AskPipeline};
use sd_protocol::{
    AskArgs, ClassifyArgs, OpName, ResourceName, SearchArgs, WirePayload, WireRequest,
    WireResponse,
};

/// Dispatches wire requests onto the pipeline.
pub struct ToolServer {
    pipeline: AskPipeline,
}

impl ToolServer {
    pub fn new(pipeline: AskPipeline) -> Self {
        Self { pipeline }
    }

    /// Handle one raw input line. Returns `None` for blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<WireResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<WireRequest>(line) {
            Ok(request) => Some(self.handle(request).await),
            Err(e) => {
                // Without a parsed frame there is no id to correlate.
                tracing::warn!(error = %e, "unparseable request frame");
                Some(WireResponse::err(Uuid::nil(), format!("bad request frame: {e}")))
            }
        }
    }

    pub async fn handle(&self, request: WireRequest) -> WireResponse {
        match self.dispatch(request.payload).await {
            Ok(result) => WireResponse::ok(request.id, result),
            Err(message) => WireResponse::err(request.id, message),
        }
    }

    async fn dispatch(&self, payload: WirePayload) -> Result<serde_json::Value, String> {
        match payload {
            WirePayload::Call { op, args } => match op {
                OpName::Ping => Ok(json!({
                    "name": "sd-toolsrv",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
                OpName::Classify => {
                    let args: ClassifyArgs = parse_args(args)?;
                    to_result(&self.pipeline.classify(&args.text))
                }
                OpName::Search => {
                    let args: SearchArgs = parse_args(args)?;
                    to_result(&self.pipeline.search(&args.q, args.top_k).await)
                }
                OpName::Similar => {
                    let args: SearchArgs = parse_args(args)?;
                    to_result(&self.pipeline.similar(&args.q, args.top_k).await)
                }
                OpName::Ask => {
                    let args: AskArgs = parse_args(args)?;
                    if args.question.trim().is_empty() {
                        return Err("question must not be empty".into());
                    }
                    to_result(&self.pipeline.ask(&args.question, AskOrigin::Provider).await)
                }
                OpName::Metrics => to_result(&self.pipeline.metrics().await),
            },
            WirePayload::Fetch { resource } => match resource {
                ResourceName::Faq => to_result(&self.pipeline.knowledge().await),
                ResourceName::Logs => to_result(&self.pipeline.log().read_all().await),
            },
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("invalid arguments: {e}"))
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|e| format!("serialization failed: {e}"))
}
