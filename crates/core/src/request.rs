//! Caller-supplied generation requests and their boundary validation.
//!
//! Requests are validated once, when constructed, and are immutable
//! afterwards. Handlers pass the raw optional fields straight in.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Video defaults
// ---------------------------------------------------------------------------

/// Default classifier-free guidance scale for video synthesis.
pub const DEFAULT_GUIDANCE_SCALE: f64 = 12.0;
/// Default output frame rate for video synthesis.
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 24;

pub const QUESTION_REQUIRED_MSG: &str = "A valid question is required.";
pub const CONTEXT_INVALID_MSG: &str = "Context must be a string.";
pub const PROMPT_REQUIRED_MSG: &str = "A valid text prompt is required.";

// ---------------------------------------------------------------------------
// Q&A
// ---------------------------------------------------------------------------

/// A validated question, optionally preceded by prior conversation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    question: String,
    context: Option<String>,
}

impl QuestionRequest {
    /// Validate raw input. The question must contain non-whitespace text;
    /// an empty context is treated as absent.
    pub fn new(question: Option<String>, context: Option<String>) -> Result<Self, CoreError> {
        let question = match question {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(CoreError::Validation(QUESTION_REQUIRED_MSG.to_string())),
        };
        let context = context.filter(|c| !c.is_empty());
        Ok(Self { question, context })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The user message sent to the completion backend: the context
    /// verbatim, a blank line, then the question.
    pub fn user_message(&self) -> String {
        match &self.context {
            Some(context) => format!("{context}\n\n{}", self.question),
            None => self.question.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// A validated text-to-video request.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    prompt: String,
    guidance_scale: f64,
    frames_per_second: u32,
}

impl VideoRequest {
    /// Validate raw input, applying defaults for omitted numeric fields.
    ///
    /// - `prompt` must contain non-whitespace text
    /// - `guidance_scale` must be finite and positive
    /// - `frames_per_second` must be a positive whole number
    pub fn new(
        prompt: Option<String>,
        guidance_scale: Option<f64>,
        frames_per_second: Option<f64>,
    ) -> Result<Self, CoreError> {
        let prompt = match prompt {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(CoreError::Validation(PROMPT_REQUIRED_MSG.to_string())),
        };

        let guidance_scale = guidance_scale.unwrap_or(DEFAULT_GUIDANCE_SCALE);
        if !guidance_scale.is_finite() || guidance_scale <= 0.0 {
            return Err(CoreError::Validation(format!(
                "guidanceScale must be a positive number, got {guidance_scale}"
            )));
        }

        let frames_per_second = match frames_per_second {
            None => DEFAULT_FRAMES_PER_SECOND,
            Some(fps) => validate_frames_per_second(fps)?,
        };

        Ok(Self {
            prompt,
            guidance_scale,
            frames_per_second,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn guidance_scale(&self) -> f64 {
        self.guidance_scale
    }

    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }
}

fn validate_frames_per_second(fps: f64) -> Result<u32, CoreError> {
    if fps.is_finite() && fps >= 1.0 && fps.fract() == 0.0 && fps <= f64::from(u32::MAX) {
        Ok(fps as u32)
    } else {
        Err(CoreError::Validation(format!(
            "framesPerSecond must be a positive whole number, got {fps}"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
