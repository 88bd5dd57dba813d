use kernel::id::Id;

pub struct AnswerMarker;
pub type AnswerId = Id<AnswerMarker>;
