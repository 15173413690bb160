//! Record binding between caller types and named sections.
//!
//! # Responsibilities
//! - Map one record type onto one section of a configuration document
//! - Pair each key name with one string field of the record
//!
//! # Design Decisions
//! - Bindings are explicit: a record lists its section and fields itself, so
//!   no runtime type inspection is involved
//! - String fields only; richer typing is the caller's concern

/// Maps a record type onto one section of a configuration document.
///
/// The section is conventionally named after the record type, and each field
/// binding pairs a key name with one string field.
///
/// ```
/// use guarded_config::Record;
///
/// struct Server {
///     host: String,
///     port: String,
/// }
///
/// impl Record for Server {
///     fn section(&self) -> &'static str {
///         "Server"
///     }
///
///     fn fields(&self) -> Vec<(&'static str, &str)> {
///         vec![("host", &self.host), ("port", &self.port)]
///     }
///
///     fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)> {
///         vec![("host", &mut self.host), ("port", &mut self.port)]
///     }
/// }
/// ```
pub trait Record {
    /// Section this record binds to.
    fn section(&self) -> &'static str;

    /// Field bindings read when writing the record into a store.
    fn fields(&self) -> Vec<(&'static str, &str)>;

    /// Field bindings written when reading the record out of a store.
    fn fields_mut(&mut self) -> Vec<(&'static str, &mut String)>;
}
