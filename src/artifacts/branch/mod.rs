pub mod branch_name;

/// Ref-name rules: no leading dot, no `..`, no control characters, spaces or
/// any of `*:?[\~^`, no `.lock` suffix, no `@{`
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Prefix of branch refs, relative to the metadata directory
pub const HEADS_REF_PREFIX: &str = "refs/heads/";
