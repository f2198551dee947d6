use std::time::Instant;

use crate::constants::{ERROR_MISSING_API_KEY, LOG_PREFIX_ERROR, LOG_PREFIX_SUCCESS};
use crate::error::HandlerError;
use crate::handlers::RequestContext;
use crate::handlers::payload::Payload;
use crate::handlers::prompts::PromptSet;
use crate::handlers::response::{AiResponse, shape_response};
use crate::handlers::task::{Task, resolve_task};
use crate::http::{GenerateRequest, GenerativeModel};
use crate::logging::{log_handler_io, log_request, log_timed};

/// One inbound invocation as seen by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiEvent {
    pub http_method: String,
    pub path: String,
    pub body: Option<String>,
}

/// Entry point for every request: method check, task routing, model call.
///
/// Never fails; every error path is folded into an [`AiResponse`].
pub async fn handle_ai_request<M: GenerativeModel>(
    context: RequestContext<'_, M>,
    event: AiEvent,
) -> AiResponse {
    let start_time = Instant::now();

    if event.http_method != "POST" {
        log_request(&event.http_method, &event.path, None);
        return AiResponse::method_not_allowed();
    }

    match dispatch(context, &event).await {
        Ok(response) => {
            log_timed(
                LOG_PREFIX_SUCCESS,
                &format!(
                    "{} {} ({})",
                    response.status_code,
                    event.path,
                    response.content_type().unwrap_or("-")
                ),
                start_time,
            );
            response
        }
        Err(err) => {
            let source = if err.is_invalid_payload() {
                "request body"
            } else if err.is_upstream() {
                "gemini"
            } else {
                "handler"
            };
            log::error!("ai-handler error ({}): {}", source, err);
            log_timed(LOG_PREFIX_ERROR, &format!("500 {}", event.path), start_time);
            AiResponse::server_error(&err.message)
        }
    }
}

async fn dispatch<M: GenerativeModel>(
    context: RequestContext<'_, M>,
    event: &AiEvent,
) -> Result<AiResponse, HandlerError> {
    let payload = Payload::parse(event.body.as_deref())?;
    let task = resolve_task(&event.path, payload.task.as_deref());
    log_request(&event.http_method, &event.path, Some(task.as_str()));

    if task == Task::Ping {
        return Ok(AiResponse::pong());
    }

    let Some(api_key) = context.environment.api_key() else {
        log::warn!("{} is not configured", ERROR_MISSING_API_KEY);
        return Ok(AiResponse::error(500, ERROR_MISSING_API_KEY));
    };

    let prompts = PromptSet::build(context.environment, &payload);
    let Some(system_instruction) = prompts.get(&task) else {
        return Ok(AiResponse::error(400, &format!("Unknown task: {}", task)));
    };

    let content = payload.trimmed_user_prompt().unwrap_or(system_instruction);
    log_handler_io("gemini content", content);

    let text = context
        .model
        .generate_content(GenerateRequest {
            api_key,
            model: context.environment.model_name(),
            system_instruction,
            content,
        })
        .await?;

    Ok(shape_response(&task, text))
}
