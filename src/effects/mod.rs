pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod postprocess;
pub(crate) mod print;
