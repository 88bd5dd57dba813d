use kernel::id::Id;

pub struct QuestionMarker;
pub type QuestionId = Id<QuestionMarker>;
