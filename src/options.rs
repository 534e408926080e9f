//!
//! Settings for the markup produced by the [`TreeReconstructor`][`super::TreeReconstructor`].
//!

use std::collections::HashSet;

const DEFAULT_DENY_LIST: [&str; 6] = ["SeekHead", "CRC-32", "Void", "Cues", "PrevSize", "Position"];
const NO_CLUSTER_DENY_LIST: [&str; 6] = ["Cluster", "Timecode", "Timestamp", "EncryptedBlock", "BlockGroup", "SimpleBlock"];

///
/// Controls which elements are written and how binary data is laid out.
///
/// The default skips elements that only describe positions inside the file (SeekHead, Cues, ...) along with padding and checksums.
///
/// ## Example
///
/// ```
/// use matroska_xml::XmlOptions;
///
/// let options = XmlOptions::no_cluster();
/// assert!(options.is_denied("SimpleBlock"));
/// assert!(options.is_denied("Void"));
/// assert!(!XmlOptions::verbose().is_denied("Void"));
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlOptions {
    ///
    /// Writes every frame as a standalone `<block>` element carrying its absolute timecode.
    ///
    pub no_cluster: bool,

    ///
    /// Number of hex characters per line of wrapped binary data.  Zero keeps the data on a single line.
    ///
    pub chunk_length: usize,

    ///
    /// Hex strings up to this many characters are written inline.
    ///
    pub inline_hex_limit: usize,

    ///
    /// Names of elements left out of the output along with their children.
    ///
    pub deny_list: HashSet<String>,
}

impl Default for XmlOptions {
    fn default() -> Self {
        XmlOptions {
            no_cluster: false,
            chunk_length: 64,
            inline_hex_limit: 40,
            deny_list: DEFAULT_DENY_LIST.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl XmlOptions {
    ///
    /// Options that write every element.  Names passed to [`XmlOptions::deny`] afterwards are still left out.
    ///
    pub fn verbose() -> Self {
        XmlOptions {
            deny_list: HashSet::new(),
            ..XmlOptions::default()
        }
    }

    ///
    /// Options that replace clusters and their blocks with standalone `<block>` elements.
    ///
    pub fn no_cluster() -> Self {
        let mut options = XmlOptions {
            no_cluster: true,
            ..XmlOptions::default()
        };
        options.deny_list.extend(NO_CLUSTER_DENY_LIST.iter().map(|name| name.to_string()));
        options
    }

    pub fn with_chunk_length(mut self, chunk_length: usize) -> Self {
        self.chunk_length = chunk_length;
        self
    }

    ///
    /// Adds names to the deny list.
    ///
    pub fn deny<I, S>(mut self, names: I) -> Self
        where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_list.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.deny_list.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::XmlOptions;

    #[test]
    fn default_hides_file_positions() {
        let options = XmlOptions::default();
        for name in ["SeekHead", "CRC-32", "Void", "Cues", "PrevSize", "Position"] {
            assert!(options.is_denied(name), "{} should be denied", name);
        }
        assert!(!options.is_denied("Cluster"));
        assert_eq!(64, options.chunk_length);
    }

    #[test]
    fn no_cluster_extends_defaults() {
        let options = XmlOptions::no_cluster();
        assert!(options.no_cluster);
        assert_eq!(12, options.deny_list.len());
        assert!(options.is_denied("Cues"));
        assert!(options.is_denied("BlockGroup"));
    }

    #[test]
    fn verbose_is_only_an_empty_deny_list() {
        let expected = XmlOptions { deny_list: HashSet::new(), ..XmlOptions::default() };
        assert_eq!(expected, XmlOptions::verbose());
    }

    #[test]
    fn builder_methods() {
        let options = XmlOptions::verbose().with_chunk_length(0).deny(["Tags"]);
        assert_eq!(0, options.chunk_length);
        assert_eq!(1, options.deny_list.len());
        assert!(options.is_denied("Tags"));
    }
}
