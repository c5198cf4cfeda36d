/// Knobs for `Class::parse_with`. The defaults accept anything that is
/// structurally decodable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DecodeOptions {
    /// Reject access flag combinations that a conforming compiler never emits.
    pub strict_access_flags: bool,
    /// Reject class files with a newer major version than this.
    pub max_major_version: Option<u16>,
    /// Check every reference inside the constant pool right after it is read,
    /// rather than only the ones the rest of the decode follows.
    pub verify_pool_references: bool,
}

impl DecodeOptions {
    pub fn strict_access_flags(mut self, strict: bool) -> Self {
        self.strict_access_flags = strict;
        self
    }

    pub fn max_major_version(mut self, major: impl Into<Option<u16>>) -> Self {
        self.max_major_version = major.into();
        self
    }

    pub fn verify_pool_references(mut self, verify: bool) -> Self {
        self.verify_pool_references = verify;
        self
    }
}
