// Compatibility Matching Engine.
// Implements: skill tokenization, local scoring, response interpretation,
// assessment orchestration, and bounded-concurrency fan-out.
// All generative calls go through the augmentation client — no direct
// Anthropic calls here.

pub mod assessor;
pub mod fanout;
pub mod handlers;
pub mod interpreter;
pub mod prompts;
pub mod scorer;
pub mod skills;
