pub(crate) mod migrate;
pub(crate) mod prompt;
pub(crate) mod schema;
pub(crate) mod serve;
