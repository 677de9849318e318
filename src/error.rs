//! The error type shared by every operation of this crate.
//!
//! Errors of the collaborators (HTTP, JSON, XML, filesystem) are wrapped as they are,
//! without any reclassification.

use reqwest::Url;
use thiserror::Error;

/// A specialized [`Result`](std::result::Result) type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong in this crate.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// Connection failures, non-2xx statuses and body read failures.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// The response body is not the expected JSON shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The response body is not the expected XML shape.
    #[error(transparent)]
    Xml(#[from] serde_xml_rs::Error),
    /// Writing the downloaded image failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A format code other than `p`, `j` or `g`.
    #[error("Invalid image type `{0}`, expected one of: 'p', 'j', 'g'")]
    InvalidImageType(char),
    /// The image file name of a post has no extension to derive a format code from.
    #[error("Image file name `{0}` has no extension")]
    MissingExtension(String),
    /// `post_num` is past the end of the fetched posts.
    #[error("Post index {index} is out of range, the response only holds {len} post(s)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of posts in the response.
        len: usize,
    },
    /// The random post redirect did not land on a URL carrying a post id.
    #[error("Can not find a post id in the redirected URL: {0}")]
    MissingPostId(Url),
    /// A URL that can not be parsed, or a base URL that can not be joined.
    #[error("Invalid URL `{0}`")]
    InvalidUrl(String),
    /// A header name or value that is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}
