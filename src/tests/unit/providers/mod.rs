//! Provider Unit Tests
//!
//! HTTP behaviour of the completion and speech providers against wiremock:
//! - request formatting
//! - response parsing
//! - rate limit, auth and quota errors
//! - timeouts

mod elevenlabs_tests;
mod openai_tests;
