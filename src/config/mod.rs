pub(crate) mod master;
