//! Value Object Module

pub mod answer_id;
pub mod email;
pub mod post_text;
pub mod question_id;
pub mod user_id;
pub mod user_password;
