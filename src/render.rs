pub(crate) mod blend;
pub(crate) mod compositor;
pub(crate) mod export;
pub(crate) mod filter;
pub(crate) mod overlay;
pub(crate) mod surface;
pub(crate) mod text;
