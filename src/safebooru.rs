//! The high-level entry point of this crate.
//!
//! See [`Safebooru`] for more information.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::api::{self, data::Post, url, Posts, Resource};
use crate::client::RequestHandler;
use crate::config::Config;
use crate::download::{Image, ImageType};
use crate::error::{Error, Result};
use crate::tool;

/// A [`RequestHandler`] with the polished operations on top of it:
/// random posts, image formats, decoded content and downloads.
///
/// # Example
///
/// ```no_run
/// use safebooru::api::{Posts, Tags};
/// use safebooru::Safebooru;
///
/// #[tokio::main]
/// async fn main() -> safebooru::Result<()> {
///     let sb = Safebooru::new()?;
///
///     // Download a random post into the current directory.
///     let id = sb.random_id().await?;
///     sb.download(&Posts::new().with_id(id)).run().await?;
///
///     // Download the 4th post of a tag query, with a custom name.
///     let posts = Posts::new().with_tags("akemi_homura").with_limit(5);
///     sb.download(&posts).post_num(3).filename("magica!").run().await?;
///
///     // The first 3 tags of the tag index, decoded and raw.
///     println!("{:?}", sb.json_from(&Tags::new().with_limit(3)).await?);
///     println!("{}", sb.content_from(&Tags::new().with_limit(3)).await?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Safebooru {
    handler: RequestHandler,
    homepage: Url,
}

impl Safebooru {
    /// Use a [`RequestHandler`] with the default headers.
    ///
    /// # Errors
    ///
    /// See [`RequestHandler::new`].
    pub fn new() -> Result<Self> {
        Ok(Self::from_handler(RequestHandler::new()?))
    }

    /// # Errors
    ///
    /// See [`RequestHandler::build`].
    pub fn build(config: &Config) -> Result<Self> {
        Ok(Self::from_handler(RequestHandler::build(config)?))
    }

    /// Talk to safebooru through an existing `handler`.
    pub fn from_handler(handler: RequestHandler) -> Self {
        Self::with_homepage(handler, url::HOMEPAGE.clone())
    }

    /// Talk to a mirror of the safebooru API at `homepage` instead of [`url::BASE_URL`].
    pub fn with_homepage(handler: RequestHandler, homepage: Url) -> Self {
        Self { handler, homepage }
    }

    /// The transport used by every operation.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// The origin every URL is resolved against.
    pub fn homepage(&self) -> &Url {
        &self.homepage
    }

    /// The ID of a random post.
    ///
    /// Slower than the other operations, the redirect of the random post page must be followed.
    ///
    /// # Errors
    ///
    /// If the request fails, or the redirected URL has no post ID, this function will return an error.
    pub async fn random_id(&self) -> Result<u64> {
        let random_url = url::url_gen(&self.homepage, url::DEST, url::RANDOM_POST_QUERY)?;
        let response = self.handler.get(random_url).await?;
        let redirected = response.url();

        tool::query_value(redirected, "id")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| Error::MissingPostId(redirected.clone()))
    }

    /// The image format of `post`, taken from the extension of [`Post::image`].
    ///
    /// Only the first character of the extension is looked at,
    /// so `"jpeg"` is a [`ImageType::Jpg`] too.
    ///
    /// # Errors
    ///
    /// If the file name has no extension, or the format is unknown,
    /// this function will return an error.
    pub fn image_ext(&self, post: &Post) -> Result<ImageType> {
        let code = Path::new(&post.image)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.chars().next())
            .ok_or_else(|| Error::MissingExtension(post.image.clone()))?;
        ImageType::try_from(code.to_ascii_lowercase())
    }

    /// The image of `post`, on [`Self::homepage`].
    ///
    /// # Errors
    ///
    /// See [`Self::image_ext`].
    pub fn image(&self, post: &Post) -> Result<Image> {
        Ok(Image::new(
            post.image_url_on(&self.homepage),
            self.image_ext(post)?,
        ))
    }

    /// Fetch `resource` and decode it: JSON for posts and tags, XML for comments.
    ///
    /// # Errors
    ///
    /// If the request fails, or the body can't be decoded, this function will return an error.
    pub async fn json_from<R: Resource>(&self, resource: &R) -> Result<R::Output> {
        api::fetch_json(resource, &self.homepage, &self.handler).await
    }

    /// Fetch the raw body of `resource`.
    ///
    /// # Errors
    ///
    /// If the request fails, this function will return an error.
    pub async fn content_from<R: Resource>(&self, resource: &R) -> Result<String> {
        api::fetch_content(resource, &self.homepage, &self.handler).await
    }

    /// Prepare the download of the image of a post matched by `posts`.
    ///
    /// See [`Download`] for the options.
    pub fn download<'a>(&'a self, posts: &'a Posts) -> Download<'a> {
        Download {
            safebooru: self,
            posts,
            post_num: 0,
            filename: None,
            directory: None,
        }
    }
}

/// A Consuming-Builders style download of one post image, created by [`Safebooru::download`].
#[must_use = "a download does nothing until `run` is awaited"]
pub struct Download<'a> {
    safebooru: &'a Safebooru,
    posts: &'a Posts,
    post_num: usize,
    filename: Option<&'a str>,
    directory: Option<&'a Path>,
}

impl<'a> Download<'a> {
    /// The zero-based index of the post among the fetched posts, default to `0`.
    pub fn post_num(self, post_num: usize) -> Self {
        Self { post_num, ..self }
    }

    /// The file stem, see [`Image::download`].
    pub fn filename(self, filename: &'a str) -> Self {
        Self {
            filename: Some(filename),
            ..self
        }
    }

    /// The directory to write into, it must exist.
    pub fn directory(self, directory: &'a Path) -> Self {
        Self {
            directory: Some(directory),
            ..self
        }
    }

    /// Fetch the posts, then download the image of the selected one.
    ///
    /// Return the path of the written file.
    ///
    /// # Errors
    ///
    /// If a request fails, `post_num` is out of range, the image format is unknown,
    /// or the file can't be written, this function will return an error.
    pub async fn run(self) -> Result<PathBuf> {
        let Self {
            safebooru,
            posts,
            post_num,
            filename,
            directory,
        } = self;

        let fetched = safebooru.json_from(posts).await?;
        let image = safebooru.image(api::nth(&fetched, post_num)?)?;
        image
            .download(&safebooru.handler, filename, directory)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::Comments;

    const CONTENT: &[u8] = b"GIF89a not really";

    fn post(id: u64, image: &str) -> serde_json::Value {
        serde_json::json!({
            "directory": "4038",
            "id": id,
            "image": image,
            "tags": "1girl akemi_homura",
        })
    }

    fn post_data(image: &str) -> Post {
        serde_json::from_value(post(1, image)).unwrap()
    }

    async fn mock_safebooru() -> (MockServer, Safebooru) {
        let server = MockServer::start().await;
        let homepage = Url::parse(&server.uri()).unwrap();
        let sb = Safebooru::with_homepage(RequestHandler::new().unwrap(), homepage);
        (server, sb)
    }

    async fn mock_posts(server: &MockServer, posts: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("s", "post"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts))
            .mount(server)
            .await;
    }

    #[test]
    fn test_image_ext() {
        let sb = Safebooru::new().unwrap();
        assert_eq!(sb.image_ext(&post_data("abc.jpg")).unwrap(), ImageType::Jpg);
        assert_eq!(sb.image_ext(&post_data("abc.png")).unwrap(), ImageType::Png);
        assert_eq!(sb.image_ext(&post_data("abc.gif")).unwrap(), ImageType::Gif);
        assert_eq!(sb.image_ext(&post_data("abc.jpeg")).unwrap(), ImageType::Jpg);

        let err = sb.image_ext(&post_data("abc.webm")).unwrap_err();
        assert!(matches!(err, Error::InvalidImageType('w')));
        let err = sb.image_ext(&post_data("abc")).unwrap_err();
        assert!(matches!(err, Error::MissingExtension(_)));
    }

    #[test]
    fn test_image() {
        let sb = Safebooru::new().unwrap();
        let image = sb.image(&post_data("245329a0.jpg")).unwrap();
        assert_eq!(
            image.url().as_str(),
            "https://safebooru.org/images/4038/245329a0.jpg?1"
        );
        assert_eq!(image.file_name(), "1.jpg");
    }

    #[tokio::test]
    async fn test_random_id() {
        let (server, sb) = mock_safebooru().await;
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("s", "random"))
            .respond_with(ResponseTemplate::new(302).insert_header(
                "Location",
                format!("{}/index.php?page=post&s=view&id=4219608", server.uri()).as_str(),
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("s", "view"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(sb.random_id().await.unwrap(), 4219608);
    }

    #[tokio::test]
    async fn test_random_id_without_redirect() {
        let (server, sb) = mock_safebooru().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = sb.random_id().await.unwrap_err();
        assert!(matches!(err, Error::MissingPostId(_)));
    }

    #[tokio::test]
    async fn test_post_by_id() {
        let (server, sb) = mock_safebooru().await;
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("s", "post"))
            .and(query_param("id", "2480127"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([post(2480127, "abc.png")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let posts = sb
            .json_from(&Posts::new().with_id(2480127))
            .await
            .unwrap();
        assert_eq!(posts[0].id, 2480127);
    }

    #[tokio::test]
    async fn test_content_from() {
        let (server, sb) = mock_safebooru().await;
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("s", "tag"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let tags = crate::api::Tags::new().with_limit(3);
        assert_eq!(sb.content_from(&tags).await.unwrap(), "[]");
        assert!(sb.json_from(&tags).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_comment_quirk() {
        let (server, sb) = mock_safebooru().await;
        Mock::given(method("GET"))
            .and(path("/index.php"))
            .and(query_param("s", "comment"))
            .and(query_param("post_id", "4084270"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<?xml version="1.0" encoding="UTF-8"?><comments type="array"></comments>"#,
            ))
            .mount(&server)
            .await;

        let comments = sb.json_from(&Comments::new(4084270)).await.unwrap();
        assert!(comments.comments.is_empty());
    }

    #[tokio::test]
    async fn test_download() {
        let (server, sb) = mock_safebooru().await;
        mock_posts(
            &server,
            serde_json::json!([post(1, "a.jpg"), post(4219608, "b.gif")]),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/images/4038/b.gif"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(CONTENT))
            .mount(&server)
            .await;
        let temp_dir = tempfile::tempdir().unwrap();
        let posts = Posts::new().with_tags("akemi_homura").with_limit(2);

        let file_path = sb
            .download(&posts)
            .post_num(1)
            .directory(temp_dir.path())
            .run()
            .await
            .expect("Download failed");
        assert_eq!(file_path, temp_dir.path().join("4219608.gif"));
        assert_eq!(std::fs::read(&file_path).unwrap(), CONTENT);

        let file_path = sb
            .download(&posts)
            .post_num(1)
            .filename("magica!")
            .directory(temp_dir.path())
            .run()
            .await
            .expect("Download failed");
        assert_eq!(file_path, temp_dir.path().join("magica!.gif"));

        temp_dir.close().unwrap();
    }

    #[tokio::test]
    async fn test_download_out_of_range() {
        let (server, sb) = mock_safebooru().await;
        mock_posts(&server, serde_json::json!([post(1, "a.jpg")])).await;

        let err = sb
            .download(&Posts::new().with_id(1))
            .post_num(5)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 5, len: 1 }));
    }
}
