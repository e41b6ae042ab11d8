/*!
# `shiftpath` Library

Parses, matches and evaluates the path specs of JSON-to-JSON shift
transforms. The tree walker and output document builder live outside this
crate and drive it through [`path::ParsedPath`], [`path::Matchable`] and
[`path::WalkedPath`].
*/

pub mod path;
