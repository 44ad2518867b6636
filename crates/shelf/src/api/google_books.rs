use log::{info, trace};
use reqwest::Url;
use serde::Deserialize;

use crate::{Book, Error, ErrorKind};

use super::Client;

pub(crate) const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub(crate) const MAX_RESULTS_LIMIT: u8 = 40;

pub(crate) fn search_volumes<C: Client>(
    client: &C,
    endpoint: &str,
    keywords: &str,
    max_results: u8,
) -> Result<Vec<Book>, Error> {
    info!("Searching for '{keywords}' using Google Books API");
    let max_results = max_results.to_string();
    let url = Url::parse_with_params(
        endpoint,
        &[("q", keywords), ("maxResults", max_results.as_str())],
    )
    .map_err(|e| {
        Error::wrap(ErrorKind::Network, e).context(format!("invalid catalog endpoint '{endpoint}'"))
    })?;

    let GoogleModel { items } = client.get_json(url.as_str())?;

    trace!("Request was successful - {} volume(s) returned", items.len());

    Ok(items.into_iter().map(|item| item.volume_info.into()).collect())
}

/// A volumes search response. `items` is left out entirely by the API when nothing matched.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API
#[derive(Deserialize, Default)]
#[cfg_attr(test, derive(Debug))]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

impl VolumeInfo {
    /// Prefers the ISBN-13, falling back on whatever identifier is listed first.
    fn isbn(&mut self) -> Option<String> {
        let index = self
            .industry_identifiers
            .iter()
            .position(|id| id.kind == "ISBN_13")
            .unwrap_or(0);
        (index < self.industry_identifiers.len())
            .then(|| self.industry_identifiers.swap_remove(index).identifier)
    }
}

impl From<VolumeInfo> for Book {
    fn from(mut info: VolumeInfo) -> Self {
        let isbn = info.isbn();
        // Deconstruct to take ownership of fields (avoids cloning).
        let VolumeInfo {
            title,
            authors,
            publisher,
            published_date,
            ..
        } = info;

        let mut book = Self::new(title, authors);
        book.publisher = publisher;
        book.published_date = published_date;
        book.isbn = isbn;
        book
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{
        assert_url, impl_text_producer, MockClient, NetworkErrorProducer, REQUEST_COUNT,
    };
    use crate::{Catalog, Error, ErrorKind};

    impl_text_producer! {
        DuneJsonProducer => Ok(include_str!("../../../../tests/data/google_books_dune.json").to_owned()),
        NoItemsProducer => Ok(r#"{"kind": "books#volumes", "totalItems": 0}"#.to_owned()),
        SparseItemProducer => Ok(r#"{"items": [{"volumeInfo": {}}, {"id": "no-volume-info"}]}"#.to_owned()),
        WrongShapeProducer => Ok(r#"{"items": "not a list"}"#.to_owned()),
        TruncatedJsonProducer => Ok(r#"{"items": [{"volumeInfo": {"title": "Du"#.to_owned()),
        UnavailableProducer => Err(Error::new(ErrorKind::Api(503), "Service Unavailable")),
        NotFoundProducer => Err(Error::new(ErrorKind::Api(404), "Not Found")),
    }

    fn catalog<P: crate::api::Producer<String>>() -> Catalog<MockClient<P>> {
        REQUEST_COUNT.with(|count| count.set(0));
        Catalog::with_client(MockClient::<P>::default())
    }

    fn requests_made() -> usize {
        REQUEST_COUNT.with(std::cell::Cell::get)
    }

    #[test]
    fn every_item_is_mapped_to_a_book() {
        let books = catalog::<DuneJsonProducer>()
            .search("Dune")
            .expect("DuneJsonProducer always produces valid volumes json");

        assert_eq!(2, books.len());

        assert_eq!("Dune", books[0].title);
        assert_eq!("Frank Herbert", books[0].author);
        assert_eq!(Some("Penguin"), books[0].publisher.as_deref());
        assert_eq!(Some("2005-08-02"), books[0].published_date.as_deref());
        assert_eq!(Some("9780441013593"), books[0].isbn.as_deref());

        assert_eq!("Dune Messiah", books[1].title);
        assert_eq!("Frank Herbert, Brian Herbert", books[1].author);
        assert_eq!(None, books[1].publisher);
        assert_eq!(Some("0593098234"), books[1].isbn.as_deref());
    }

    #[test]
    fn keywords_are_url_encoded_with_max_results() {
        catalog::<DuneJsonProducer>()
            .max_results(3)
            .search("dune & sons")
            .unwrap();
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=dune+%26+sons&maxResults=3");
    }

    #[test]
    fn max_results_is_clamped_to_api_limit() {
        catalog::<NoItemsProducer>().max_results(200).search("x").unwrap();
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=x&maxResults=40");

        catalog::<NoItemsProducer>().max_results(0).search("x").unwrap();
        assert_url!("https://www.googleapis.com/books/v1/volumes?q=x&maxResults=1");
    }

    #[test]
    fn custom_endpoint_is_used() {
        catalog::<NoItemsProducer>()
            .endpoint("http://localhost:8080/volumes")
            .search("dune")
            .unwrap();
        assert_url!("http://localhost:8080/volumes?q=dune&maxResults=8");
    }

    #[test]
    fn invalid_endpoint_is_a_network_error() {
        let err = catalog::<NoItemsProducer>()
            .endpoint("not a url")
            .search("dune")
            .unwrap_err();
        assert_eq!(ErrorKind::Network, err.kind());
        assert_eq!(0, requests_made());
    }

    #[test]
    fn no_items_is_an_empty_result() {
        let books = catalog::<NoItemsProducer>().search("zzzzzz").unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn missing_volume_fields_use_placeholders() {
        let books = catalog::<SparseItemProducer>().search("anything").unwrap();
        assert_eq!(2, books.len());
        for book in books {
            assert_eq!(crate::book::UNKNOWN_TITLE, book.title);
            assert_eq!(crate::book::UNKNOWN_AUTHOR, book.author);
            assert_eq!(None, book.isbn);
        }
    }

    #[test]
    fn unexpected_json_is_a_parse_error() {
        let err = catalog::<WrongShapeProducer>().search("dune").unwrap_err();
        assert_eq!(ErrorKind::Parse, err.kind());

        let err = catalog::<TruncatedJsonProducer>().search("dune").unwrap_err();
        assert_eq!(ErrorKind::Parse, err.kind());
    }

    #[test]
    fn client_errors_are_returned_without_retry() {
        let err = catalog::<UnavailableProducer>().search("dune").unwrap_err();
        assert_eq!(ErrorKind::Api(503), err.kind());
        assert_eq!(Some(503), err.status());
        assert_eq!(1, requests_made());

        let err = catalog::<NotFoundProducer>().search("dune").unwrap_err();
        assert_eq!(Some(404), err.status());
        assert_eq!(1, requests_made());
    }

    #[test]
    fn network_failure_is_returned_without_retry() {
        let err = catalog::<NetworkErrorProducer>().search("dune").unwrap_err();
        assert_eq!(ErrorKind::Network, err.kind());
        assert_eq!(1, requests_made());
    }
}

#[test]
fn isbn_13_is_preferred_over_other_identifiers() {
    let json = r#"{
        "title": "Dune",
        "industryIdentifiers": [
            {"type": "ISBN_10", "identifier": "0441013597"},
            {"type": "ISBN_13", "identifier": "9780441013593"}
        ]
    }"#;
    let info: VolumeInfo = serde_json::from_str(json).unwrap();
    let book = Book::from(info);

    assert_eq!(Some("9780441013593"), book.isbn.as_deref());
}

#[test]
fn first_identifier_is_used_without_isbn_13() {
    let json = r#"{
        "title": "Dune",
        "industryIdentifiers": [
            {"type": "OTHER", "identifier": "UOM:39015004587543"},
            {"type": "ISBN_10", "identifier": "0441013597"}
        ]
    }"#;
    let info: VolumeInfo = serde_json::from_str(json).unwrap();

    assert_eq!(Some("UOM:39015004587543"), Book::from(info).isbn.as_deref());
}
