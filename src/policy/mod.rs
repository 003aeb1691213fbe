pub(crate) mod terms;
pub(crate) mod validator;
