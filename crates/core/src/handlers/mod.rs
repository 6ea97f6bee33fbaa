mod release;

pub(crate) use release::release_handler;
