//! A core module for interacting with the safebooru API.
//!
//! Every query to the API is an immutable descriptor implementing [`Resource`]:
//! [`Posts`], [`Tags`] and [`Comments`].
//! A descriptor builds its own URL and knows how to decode the response into [`data`].
//!
//! See: <https://safebooru.org/index.php?page=help&topic=dapi>

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::client::RequestHandler;
use crate::error::{Error, Result};

/// The URLs of the safebooru API.
pub mod url {
    use std::sync::LazyLock;

    use super::*;

    /// The origin of safebooru, every other URL is resolved against it.
    pub const BASE_URL: &str = "https://safebooru.org";

    /// The entry point of the API, relative to [`BASE_URL`].
    pub const DEST: &str = "index.php?";

    /// [`BASE_URL`] parsed as [`Url`].
    pub static HOMEPAGE: LazyLock<Url> =
        LazyLock::new(|| Url::parse(BASE_URL).expect("`BASE_URL` is a valid URL"));

    /// The query redirecting to a random post page.
    pub const RANDOM_POST_QUERY: &[(&str, &str)] = &[("page", "post"), ("s", "random")];

    /// Generate the URL `{base}/{dest}{key=value&...}`.
    ///
    /// `params` are joined in the given order.
    ///
    /// <div class="warning">
    ///
    /// The values are **not** percent-encoded:
    /// a value containing `&` or `=` will break the query.
    /// Only the characters which can never appear in a query (e.g. spaces)
    /// are escaped by the URL parser.
    ///
    /// </div>
    ///
    /// # Example
    ///
    /// ```rust
    /// use safebooru::api::url::{url_gen, DEST, HOMEPAGE};
    ///
    /// let url = url_gen(&HOMEPAGE, DEST, &[("page", "help"), ("topic", "dapi")])?;
    /// assert_eq!(url.as_str(), "https://safebooru.org/index.php?page=help&topic=dapi");
    /// # Ok::<(), safebooru::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// If `dest` can't be resolved against `base` (e.g. `base` is a `mailto:` URL),
    /// this function will return an error.
    pub fn url_gen<K, V>(base: &Url, dest: &str, params: &[(K, V)]) -> Result<Url>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key.as_ref(), value.as_ref()))
            .collect::<Vec<_>>()
            .join("&");
        // `dest` ends with `?`, so the joined URL only has a path, we set the query ourselves.
        let mut url = base
            .join(dest)
            .map_err(|_| Error::InvalidUrl(format!("{base}{dest}")))?;
        url.set_query(Some(&query));
        Ok(url)
    }
}

/// The decoded responses of the safebooru API.
pub mod data {
    use serde::{Deserialize, Deserializer, Serialize};

    use super::*;

    /// The API is not consistent about numbers, some of them are sent as strings.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNum {
        Str(String),
        Num(serde_json::Number),
    }

    fn stringify<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StrOrNum::deserialize(deserializer)? {
            StrOrNum::Str(s) => s,
            StrOrNum::Num(n) => n.to_string(),
        })
    }

    impl StrOrNum {
        fn into_u64<E: serde::de::Error>(self) -> std::result::Result<u64, E> {
            match self {
                Self::Str(s) => s.trim().parse().map_err(E::custom),
                Self::Num(n) => n
                    .as_u64()
                    .ok_or_else(|| E::custom(format!("{n} is not an unsigned integer"))),
            }
        }
    }

    fn number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        StrOrNum::deserialize(deserializer)?.into_u64()
    }

    /// Like [`number`], but `null` is `0`.
    fn nullable_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<StrOrNum>::deserialize(deserializer)? {
            Some(value) => value.into_u64(),
            None => Ok(0),
        }
    }

    /// `null` is the default value.
    fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// One post record of the JSON post index.
    #[non_exhaustive]
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Post {
        /// The ID of the post.
        #[serde(deserialize_with = "number")]
        pub id: u64,
        /// The directory of the image under `/images/`.
        #[serde(deserialize_with = "stringify")]
        pub directory: String,
        /// The stored file name of the image, e.g. `"2453...6e0b.jpg"`.
        pub image: String,
        /// The tags of the post, separated by spaces.
        #[serde(default, deserialize_with = "nullable")]
        pub tags: String,
        /// The MD5 hash of the image.
        #[serde(default, deserialize_with = "nullable")]
        pub hash: String,
        /// The rating of the post, always `"safe"` or `"general"` on safebooru.
        #[serde(default, deserialize_with = "nullable")]
        pub rating: String,
        /// The change ID, in Unix time.
        #[serde(default, deserialize_with = "nullable_number")]
        pub change: u64,
        /// The width of the image in pixels.
        #[serde(default, deserialize_with = "nullable_number")]
        pub width: u64,
        /// The height of the image in pixels.
        #[serde(default, deserialize_with = "nullable_number")]
        pub height: u64,
        /// The uploader.
        #[serde(default, deserialize_with = "nullable")]
        pub owner: String,
        /// Where the image comes from, usually a URL.
        #[serde(default, deserialize_with = "nullable")]
        pub source: String,
        /// Other fields of the record, kept as they are.
        #[serde(flatten)]
        pub extra: serde_json::Map<String, serde_json::Value>,
    }

    impl Post {
        /// The location of the image: `{origin}/images/{directory}/{image}?{id}`.
        pub fn image_url(&self) -> Url {
            self.image_url_on(&url::HOMEPAGE)
        }

        /// Same as [`Self::image_url`], but resolved against `origin`.
        pub fn image_url_on(&self, origin: &Url) -> Url {
            let mut url = origin.clone();
            url.set_path(&format!("/images/{}/{}", self.directory, self.image));
            url.set_query(Some(&self.id.to_string()));
            url
        }
    }

    /// One tag record of the tag index.
    #[non_exhaustive]
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Tag {
        /// The ID of the tag.
        #[serde(deserialize_with = "number")]
        pub id: u64,
        /// The tag itself, e.g. `"akemi_homura"`.
        pub name: String,
        /// The number of posts with this tag.
        #[serde(default, deserialize_with = "nullable_number")]
        pub count: u64,
        /// The tag category (general, artist, copyright, ...) as a number.
        #[serde(default, rename = "type", deserialize_with = "nullable_number")]
        pub kind: u64,
        /// Whether the tag is ambiguous, as sent by the API.
        #[serde(default)]
        pub ambiguous: serde_json::Value,
    }

    /// One `<comment/>` element of the comment index.
    #[non_exhaustive]
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Comment {
        /// The ID of the comment.
        pub id: u64,
        /// The post this comment belongs to.
        pub post_id: u64,
        /// The text of the comment.
        pub body: String,
        /// The name of the author.
        #[serde(default)]
        pub creator: String,
        /// The user ID of the author.
        #[serde(default)]
        pub creator_id: String,
        /// e.g. `"2022-11-12 21:20"`.
        #[serde(default)]
        pub created_at: String,
    }

    /// The `<comments>` document of the comment index.
    ///
    /// A post with exactly one comment is answered with an empty document by the API,
    /// so [`Self::comments`] may be empty even if the post has comments.
    #[non_exhaustive]
    #[derive(Debug, Clone, Default, Deserialize, Serialize)]
    pub struct CommentList {
        /// The `<comment/>` elements, in document order.
        #[serde(default, rename = "comment")]
        pub comments: Vec<Comment>,
    }
}

/// A query to the safebooru API.
///
/// The URL is recomputed on every call, it's a pure function of the descriptor fields,
/// [`url::DEST`] and the origin.
pub trait Resource {
    /// The decoded response.
    type Output: DeserializeOwned;

    /// The query parameters, in the order they are sent.
    fn params(&self) -> Vec<(&'static str, String)>;

    /// Decode a response body.
    ///
    /// # Errors
    ///
    /// If `body` does not match [`Self::Output`], this function will return an error.
    fn decode(body: &str) -> Result<Self::Output>;

    /// The URL of this query on safebooru.
    ///
    /// # Errors
    ///
    /// See [`url::url_gen`].
    fn url(&self) -> Result<Url> {
        self.url_on(&url::HOMEPAGE)
    }

    /// The URL of this query on `origin`.
    ///
    /// # Errors
    ///
    /// See [`url::url_gen`].
    fn url_on(&self, origin: &Url) -> Result<Url> {
        url::url_gen(origin, url::DEST, &self.params())
    }
}

/// The fixed selector keys of the `dapi` index for the resource `s`.
#[inline]
fn index_params(s: &'static str) -> Vec<(&'static str, String)> {
    vec![
        ("page", String::from("dapi")),
        ("s", String::from(s)),
        ("q", String::from("index")),
    ]
}

/// A query to the post index.
///
/// See <https://safebooru.org/index.php?page=help&topic=dapi> for the fields.
///
/// # Example
///
/// ```no_run
/// use safebooru::api::Posts;
/// use safebooru::client::RequestHandler;
///
/// #[tokio::main]
/// async fn main() -> safebooru::Result<()> {
///     let handler = RequestHandler::new()?;
///     let posts = Posts::new().with_tags("cat").with_limit(5);
///
///     for post in posts.fetch_json(&handler).await? {
///         println!("{}: {}", post.id, post.image_url());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Posts {
    limit: u64,
    pid: u64,
    tags: String,
    cid: u64,
    id: u64,
}

impl Default for Posts {
    fn default() -> Self {
        Self {
            limit: Self::MAX_LIMIT,
            pid: 0,
            tags: String::new(),
            cid: 0,
            id: 0,
        }
    }
}

impl Posts {
    /// The API never returns more posts than this per request.
    pub const MAX_LIMIT: u64 = 100;

    /// The first page of the latest [`Self::MAX_LIMIT`] posts.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many posts to retrieve, at most [`Self::MAX_LIMIT`].
    pub fn with_limit(self, limit: u64) -> Self {
        Self { limit, ..self }
    }

    /// The page number.
    pub fn with_pid(self, pid: u64) -> Self {
        Self { pid, ..self }
    }

    /// The tags to search for. Any tag combination that works on the web site works here,
    /// including the meta-tags.
    ///
    /// Separate tags with `+`, see [`url::url_gen`] about escaping.
    pub fn with_tags(self, tags: impl Into<String>) -> Self {
        Self {
            tags: tags.into(),
            ..self
        }
    }

    /// The change ID of the post, in Unix time.
    pub fn with_cid(self, cid: u64) -> Self {
        Self { cid, ..self }
    }

    /// The post ID.
    pub fn with_id(self, id: u64) -> Self {
        Self { id, ..self }
    }

    /// See [`Self::with_limit`].
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// See [`Self::with_pid`].
    pub fn pid(&self) -> u64 {
        self.pid
    }

    /// See [`Self::with_tags`].
    pub fn tags(&self) -> &str {
        &self.tags
    }

    /// See [`Self::with_cid`].
    pub fn cid(&self) -> u64 {
        self.cid
    }

    /// See [`Self::with_id`].
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Fetch and decode the post records.
    ///
    /// # Errors
    ///
    /// If the request fails or the body is not a JSON array of posts,
    /// this function will return an error.
    /// Note that the API answers a query without any result with an empty body,
    /// which is reported as a JSON error.
    pub async fn fetch_json(&self, handler: &RequestHandler) -> Result<Vec<data::Post>> {
        fetch_json(self, &url::HOMEPAGE, handler).await
    }

    /// Fetch the raw response body.
    ///
    /// # Errors
    ///
    /// If the request fails, this function will return an error.
    pub async fn fetch_content(&self, handler: &RequestHandler) -> Result<String> {
        fetch_content(self, &url::HOMEPAGE, handler).await
    }

    /// Fetch the posts and return the image URL of the `index`-th (zero-based) one.
    ///
    /// # Errors
    ///
    /// If the request fails, or `index` is out of range of the fetched posts,
    /// this function will return an error.
    pub async fn image_url(&self, handler: &RequestHandler, index: usize) -> Result<Url> {
        let posts = self.fetch_json(handler).await?;
        Ok(nth(&posts, index)?.image_url())
    }
}

impl Resource for Posts {
    type Output = Vec<data::Post>;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = index_params("post");
        params.extend([
            ("json", String::from("1")),
            ("limit", self.limit.to_string()),
            ("pid", self.pid.to_string()),
            ("tags", self.tags.clone()),
            ("cid", self.cid.to_string()),
            ("id", self.id.to_string()),
        ]);
        params
    }

    fn decode(body: &str) -> Result<Self::Output> {
        Ok(serde_json::from_str(body)?)
    }
}

/// A query to the tag index.
///
/// Only the fields that have been set are sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tags {
    id: Option<u64>,
    limit: u64,
    after_id: Option<u64>,
    name: Option<String>,
    name_pattern: Option<String>,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            id: None,
            limit: Self::DEFAULT_LIMIT,
            after_id: None,
            name: None,
            name_pattern: None,
        }
    }
}

impl Tags {
    /// How many tags are retrieved if [`Self::with_limit`] is not used.
    pub const DEFAULT_LIMIT: u64 = 100;

    /// The first [`Self::DEFAULT_LIMIT`] tags of the index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag's id in the database.
    pub fn with_id(self, id: u64) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// How many tags to retrieve.
    pub fn with_limit(self, limit: u64) -> Self {
        Self { limit, ..self }
    }

    /// Only tags whose ID is greater than `after_id`.
    pub fn with_after_id(self, after_id: u64) -> Self {
        Self {
            after_id: Some(after_id),
            ..self
        }
    }

    /// The exact tag name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// A `LIKE` pattern: `_` matches one character, `%` any number of characters.
    pub fn with_name_pattern(self, name_pattern: impl Into<String>) -> Self {
        Self {
            name_pattern: Some(name_pattern.into()),
            ..self
        }
    }

    /// Fetch and decode the tag records.
    ///
    /// # Errors
    ///
    /// If the request fails or the body is not a JSON array of tags,
    /// this function will return an error.
    pub async fn fetch_json(&self, handler: &RequestHandler) -> Result<Vec<data::Tag>> {
        fetch_json(self, &url::HOMEPAGE, handler).await
    }

    /// Fetch the raw response body.
    ///
    /// # Errors
    ///
    /// If the request fails, this function will return an error.
    pub async fn fetch_content(&self, handler: &RequestHandler) -> Result<String> {
        fetch_content(self, &url::HOMEPAGE, handler).await
    }
}

impl Resource for Tags {
    type Output = Vec<data::Tag>;

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = index_params("tag");
        params.push(("json", String::from("1")));
        params.push(("limit", self.limit.to_string()));
        if let Some(id) = self.id {
            params.push(("id", id.to_string()));
        }
        if let Some(after_id) = self.after_id {
            params.push(("after_id", after_id.to_string()));
        }
        if let Some(name) = &self.name {
            params.push(("name", name.clone()));
        }
        if let Some(name_pattern) = &self.name_pattern {
            params.push(("name_pattern", name_pattern.clone()));
        }
        params
    }

    fn decode(body: &str) -> Result<Self::Output> {
        Ok(serde_json::from_str(body)?)
    }
}

/// A query to the comment index, answered in XML.
///
/// <div class="warning">
///
/// The API only returns comments of a post which has more than one comment,
/// the listing of a post with exactly one comment is empty.
///
/// </div>
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Comments {
    post_id: u64,
    list_all: bool,
}

impl Comments {
    /// The comments of the post `post_id`.
    pub fn new(post_id: u64) -> Self {
        Self {
            post_id,
            list_all: false,
        }
    }

    /// The whole comment index, `post_id` is ignored.
    pub fn all() -> Self {
        Self {
            post_id: 0,
            list_all: true,
        }
    }

    /// List the whole comment index instead of the comments of [`Self::post_id`].
    pub fn with_list_all(self, list_all: bool) -> Self {
        Self { list_all, ..self }
    }

    /// The post the comments belong to.
    pub fn post_id(&self) -> u64 {
        self.post_id
    }

    /// See [`Self::with_list_all`].
    pub fn list_all(&self) -> bool {
        self.list_all
    }

    /// Fetch the XML listing and decode it.
    ///
    /// # Errors
    ///
    /// If the request fails or the body is not a comment document,
    /// this function will return an error.
    pub async fn fetch_json(&self, handler: &RequestHandler) -> Result<data::CommentList> {
        fetch_json(self, &url::HOMEPAGE, handler).await
    }

    /// Fetch the raw XML.
    ///
    /// # Errors
    ///
    /// If the request fails, this function will return an error.
    pub async fn fetch_content(&self, handler: &RequestHandler) -> Result<String> {
        fetch_content(self, &url::HOMEPAGE, handler).await
    }
}

impl Resource for Comments {
    type Output = data::CommentList;

    fn params(&self) -> Vec<(&'static str, String)> {
        let post_id = if self.list_all {
            String::new()
        } else {
            self.post_id.to_string()
        };
        let mut params = index_params("comment");
        params.push(("post_id", post_id));
        params
    }

    fn decode(body: &str) -> Result<Self::Output> {
        Ok(serde_xml_rs::from_str(body)?)
    }
}

/// Fetch `resource` from `origin` and decode it.
pub(crate) async fn fetch_json<R: Resource>(
    resource: &R,
    origin: &Url,
    handler: &RequestHandler,
) -> Result<R::Output> {
    R::decode(&fetch_content(resource, origin, handler).await?)
}

/// Fetch the raw body of `resource` from `origin`.
pub(crate) async fn fetch_content<R: Resource>(
    resource: &R,
    origin: &Url,
    handler: &RequestHandler,
) -> Result<String> {
    handler.get_text(resource.url_on(origin)?).await
}

/// The `index`-th post, or an [`Error::IndexOutOfRange`].
pub(crate) fn nth(posts: &[data::Post], index: usize) -> Result<&data::Post> {
    posts.get(index).ok_or(Error::IndexOutOfRange {
        index,
        len: posts.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_URL: &str = "https://safebooru.org/index.php?page=dapi&s=post&q=index&json=1&limit=100&pid=0&tags=&cid=0&id=2480127";

    const POST_JSON: &str = r#"[{
        "preview_url": "https://safebooru.org/thumbnails/4038/thumbnail_245329a0ea470d939fdfd436253fbd035a926e0b.jpg",
        "directory": "4038",
        "hash": "d24c6ac7c6d5c2b5e57d0e1d5d3bb0b2",
        "height": 1200,
        "id": 4219608,
        "image": "245329a0ea470d939fdfd436253fbd035a926e0b.jpg",
        "change": 1668288023,
        "owner": "danbooru",
        "parent_id": 0,
        "rating": "safe",
        "sample": 0,
        "score": null,
        "tags": "1girl akemi_homura",
        "width": 900,
        "comment_count": 0
    }]"#;

    const COMMENTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<comments type="array">
<comment created_at="2022-11-12 21:20" post_id="4084270" body="first" creator="alice" id="11" creator_id="101"/>
<comment created_at="2022-11-13 08:02" post_id="4084270" body="second" creator="bob" id="12" creator_id="102"/>
</comments>"#;

    #[test]
    fn test_url_gen() {
        let url =
            url::url_gen(&url::HOMEPAGE, url::DEST, &[("page", "help"), ("topic", "dapi")])
                .unwrap();
        assert_eq!(
            url.as_str(),
            "https://safebooru.org/index.php?page=help&topic=dapi"
        );
    }

    #[test]
    fn test_url_gen_keeps_reserved_chars() {
        let url = url::url_gen(&url::HOMEPAGE, url::DEST, &[("tags", "a&b=c")]).unwrap();
        assert_eq!(url.query(), Some("tags=a&b=c"));
    }

    #[test]
    fn test_url_gen_cannot_be_a_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        let err = url::url_gen(&base, url::DEST, &[("page", "help")]).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        let err = Posts::new().url_on(&base).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_posts_url() {
        let posts = Posts::new().with_id(2480127);
        assert_eq!(posts.url().unwrap().as_str(), POST_URL);
        // recomputed, never cached
        assert_eq!(posts.url().unwrap(), posts.url().unwrap());
    }

    #[test]
    fn test_posts_params_order() {
        let posts = Posts::new().with_tags("cat").with_limit(5).with_pid(2);
        let keys: Vec<_> = posts.params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["page", "s", "q", "json", "limit", "pid", "tags", "cid", "id"]
        );
        assert_eq!(
            posts.url().unwrap().query(),
            Some("page=dapi&s=post&q=index&json=1&limit=5&pid=2&tags=cat&cid=0&id=0")
        );
    }

    #[test]
    fn test_comments_url() {
        assert_eq!(
            Comments::new(4084270).url().unwrap().as_str(),
            "https://safebooru.org/index.php?page=dapi&s=comment&q=index&post_id=4084270"
        );
        let all = Comments::new(4084270).with_list_all(true);
        assert_eq!(
            all.url().unwrap().as_str(),
            "https://safebooru.org/index.php?page=dapi&s=comment&q=index&post_id="
        );
        assert_eq!(all.url().unwrap(), Comments::all().url().unwrap());
    }

    #[test]
    fn test_tags_url() {
        assert_eq!(
            Tags::new().with_limit(3).url().unwrap().query(),
            Some("page=dapi&s=tag&q=index&json=1&limit=3")
        );
        assert_eq!(
            Tags::new().with_name("akemi_homura").url().unwrap().query(),
            Some("page=dapi&s=tag&q=index&json=1&limit=100&name=akemi_homura")
        );

        // the optional keys come after `limit` in a fixed order,
        // whatever order the builder methods are called in
        let tags = Tags::new()
            .with_name_pattern("homu_")
            .with_name("akemi_homura")
            .with_after_id(2)
            .with_id(1);
        let keys: Vec<_> = tags.params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["page", "s", "q", "json", "limit", "id", "after_id", "name", "name_pattern"]
        );
        assert_eq!(
            tags.url().unwrap().query(),
            Some("page=dapi&s=tag&q=index&json=1&limit=100&id=1&after_id=2&name=akemi_homura&name_pattern=homu_")
        );
    }

    #[test]
    fn test_decode_posts() {
        let posts = Posts::decode(POST_JSON).unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, 4219608);
        assert_eq!(post.directory, "4038");
        assert_eq!(post.width, 900);
        assert!(post.extra.contains_key("preview_url"));
        assert_eq!(
            post.image_url().as_str(),
            "https://safebooru.org/images/4038/245329a0ea470d939fdfd436253fbd035a926e0b.jpg?4219608"
        );
    }

    #[test]
    fn test_decode_null_fields() {
        let posts = Posts::decode(
            r#"[{"directory": "1", "id": 2, "image": "a.png", "hash": null, "source": null,
                 "owner": null, "rating": null, "tags": "x", "width": null, "height": "7",
                 "change": null}]"#,
        )
        .unwrap();
        let post = &posts[0];
        assert_eq!(post.hash, "");
        assert_eq!(post.source, "");
        assert_eq!(post.owner, "");
        assert_eq!(post.rating, "");
        assert_eq!(post.tags, "x");
        assert_eq!(post.width, 0);
        assert_eq!(post.height, 7);
        assert_eq!(post.change, 0);

        let tags =
            Tags::decode(r#"[{"id": 1, "name": "x", "count": null, "type": null}]"#).unwrap();
        assert_eq!((tags[0].count, tags[0].kind), (0, 0));
    }

    #[test]
    fn test_decode_numeric_directory() {
        let posts =
            Posts::decode(r#"[{"directory": 12, "id": "7", "image": "a.png"}]"#).unwrap();
        assert_eq!(posts[0].directory, "12");
        assert_eq!(posts[0].id, 7);
    }

    #[test]
    fn test_decode_empty_posts_body() {
        let err = Posts::decode("").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_decode_tags() {
        let tags = Tags::decode(
            r#"[{"id": 3, "name": "akemi_homura", "count": "1024", "type": 4, "ambiguous": false}]"#,
        )
        .unwrap();
        assert_eq!(tags[0].name, "akemi_homura");
        assert_eq!(tags[0].count, 1024);
        assert_eq!(tags[0].kind, 4);
    }

    #[test]
    fn test_decode_comments() {
        let list = Comments::decode(COMMENTS_XML).unwrap();
        assert_eq!(list.comments.len(), 2);
        assert_eq!(list.comments[0].id, 11);
        assert_eq!(list.comments[1].post_id, 4084270);
        assert_eq!(list.comments[1].creator, "bob");
    }

    #[test]
    fn test_decode_empty_comments() {
        let list = Comments::decode(
            r#"<?xml version="1.0" encoding="UTF-8"?><comments type="array"></comments>"#,
        )
        .unwrap();
        assert!(list.comments.is_empty());
    }

    #[test]
    fn test_nth() {
        let posts = Posts::decode(POST_JSON).unwrap();
        assert_eq!(nth(&posts, 0).unwrap().id, 4219608);
        let err = nth(&posts, 3).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 1 }));
    }
}
