//! Post images and how to save them.
//!
//! See [`Image`] for more information.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Url;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::client::RequestHandler;
use crate::error::{Error, Result};

/// The image formats stored on safebooru, identified by a one-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// `p`, `.png`
    Png,
    /// `j`, `.jpg`
    Jpg,
    /// `g`, `.gif`
    Gif,
}

impl ImageType {
    /// The one-character code of the format.
    pub const fn code(self) -> char {
        match self {
            Self::Png => 'p',
            Self::Jpg => 'j',
            Self::Gif => 'g',
        }
    }

    /// The file extension, with its leading dot, e.g. `".gif"`.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpg => ".jpg",
            Self::Gif => ".gif",
        }
    }

    /// The file extension of the format `code`.
    ///
    /// ```rust
    /// use safebooru::download::ImageType;
    ///
    /// assert_eq!(ImageType::which('g').unwrap(), ".gif");
    /// assert!(ImageType::which('s').is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// If `code` is not one of `'p'`, `'j'` or `'g'`, this function will return an error.
    pub fn which(code: char) -> Result<&'static str> {
        Self::try_from(code).map(Self::extension)
    }
}

impl TryFrom<char> for ImageType {
    type Error = Error;

    fn try_from(code: char) -> Result<Self> {
        match code {
            'p' => Ok(Self::Png),
            'j' => Ok(Self::Jpg),
            'g' => Ok(Self::Gif),
            code => Err(Error::InvalidImageType(code)),
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The image file of a post, stored on safebooru.
///
/// # Example
///
/// ```no_run
/// use safebooru::client::RequestHandler;
/// use safebooru::download::{Image, ImageType};
///
/// #[tokio::main]
/// async fn main() -> safebooru::Result<()> {
///     let handler = RequestHandler::new()?;
///     let image = Image::parse(
///         "https://safebooru.org/images/4038/245329a0ea470d939fdfd436253fbd035a926e0b.jpg?4219608",
///         ImageType::Jpg,
///     )?;
///     // saved as `./4219608.jpg`
///     image.download(&handler, None, None).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    url: Url,
    kind: ImageType,
}

impl Image {
    /// An image at `url`, saved with the extension of `kind`.
    pub fn new(url: Url, kind: ImageType) -> Self {
        Self { url, kind }
    }

    /// # Errors
    ///
    /// If `url` is not a valid URL, this function will return an error.
    pub fn parse(url: &str, kind: ImageType) -> Result<Self> {
        let url = Url::parse(url).map_err(|_| Error::InvalidUrl(url.to_owned()))?;
        Ok(Self::new(url, kind))
    }

    /// Where the image is fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The format of the image.
    pub fn kind(&self) -> ImageType {
        self.kind
    }

    /// The default file name: the query of the URL (the post ID) with the extension,
    /// e.g. `"4219608.jpg"`.
    pub fn file_name(&self) -> String {
        self.file_name_with_stem(self.url.query().unwrap_or_default())
    }

    /// `stem` with the extension of [`Self::kind`].
    pub fn file_name_with_stem(&self, stem: &str) -> String {
        format!("{stem}{}", self.kind.extension())
    }

    /// Fetch the image and write it to a file, then return the file path.
    ///
    /// - `file_name`: the file stem, the extension is always appended.
    ///     Default to [`Self::file_name`].
    /// - `directory`: where to write the file, default to the current directory.
    ///     It will **not** be created.
    ///
    /// An existing file is overwritten.
    ///
    /// # Errors
    ///
    /// If the request fails, or the file can't be written, this function will return an error.
    /// The file may be left partially written.
    pub async fn download(
        &self,
        handler: &RequestHandler,
        file_name: Option<&str>,
        directory: Option<&Path>,
    ) -> Result<PathBuf> {
        let file_name = match file_name {
            Some(stem) => self.file_name_with_stem(stem),
            None => self.file_name(),
        };
        let file_path = match directory {
            Some(directory) => directory.join(file_name),
            None => PathBuf::from(file_name),
        };

        let response = handler.get(self.url.clone()).await?;
        write_response(response, &file_path).await?;
        log::info!("saved {} to {}", self.url, file_path.display());
        Ok(file_path)
    }
}

/// Stream the body of `response` into the file at `file_path`.
async fn write_response(mut response: reqwest::Response, file_path: &Path) -> Result<()> {
    let mut file_buf = BufWriter::new(File::create(file_path).await?);

    while let Some(mut chunk) = response.chunk().await? {
        file_buf.write_all_buf(&mut chunk).await?;
    }

    file_buf.flush().await?;
    Ok(())
}
