#[derive(Debug, Default, Clone)]
pub(crate) struct Statistics {
    pub(crate) decisions: u32,
    pub(crate) undos: u32,
    pub(crate) redos: u32,
    pub(crate) implications: u32,
    pub(crate) conflicts: u32,
    pub(crate) learned_clauses: u32,
}
