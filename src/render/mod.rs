pub(crate) mod output;
pub(crate) mod pipeline;
pub(crate) mod spine;
