use std::time::Duration;

use log::trace;
use serde::de::DeserializeOwned;

use crate::{Book, Error, ErrorKind};

pub(crate) mod google_books;

/// Default number of results asked for in a single search.
pub const DEFAULT_MAX_RESULTS: u8 = 8;
/// Default time allowed for a catalog request before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Performs a single HTTP GET and decodes the JSON body.
///
/// Implementations must report failures with the most specific [`ErrorKind`]:
/// [`ErrorKind::Network`] when the service cannot be reached, [`ErrorKind::Api`] for a non-success
/// status and [`ErrorKind::Parse`] when the body is not the expected JSON.
pub trait Client {
    /// Sends a GET request to `url` and deserializes the JSON response body.
    ///
    /// # Errors
    ///
    /// See the trait level documentation for the kinds of error returned.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::Network, e))?;

        let status = resp.status();
        trace!("Catalog responded with {status}");
        if !status.is_success() {
            return Err(Error::new(
                ErrorKind::Api(status.as_u16()),
                format!("the catalog refused the request with '{status}'"),
            ));
        }

        // a timeout while the body is still arriving is a network failure, not bad JSON
        let body = resp
            .bytes()
            .map_err(|e| Error::wrap(ErrorKind::Network, e).context("cannot read catalog response"))?;

        serde_json::from_slice(&body).map_err(|e| Error::wrap(ErrorKind::Parse, e))
    }
}

/// The book catalog searched by the application.
///
/// The catalog is generic over its [`Client`] so that the HTTP transport can be replaced.
pub struct Catalog<C: Client = reqwest::blocking::Client> {
    client: C,
    endpoint: String,
    max_results: u8,
}

impl Catalog {
    /// Creates a catalog backed by a blocking HTTP client which gives up on a request after
    /// `timeout`.
    ///
    /// # Errors
    ///
    /// An [`Err`] with [`ErrorKind::Network`] is returned when the HTTP client cannot be built.
    pub fn connect(timeout: Duration) -> Result<Self, Error> {
        trace!("Building HTTP client with a timeout of {timeout:?}");
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::with_client)
            .map_err(|e| Error::wrap(ErrorKind::Network, e).context("cannot build HTTP client"))
    }
}

impl<C: Client> Catalog<C> {
    /// Creates a catalog that sends its requests with `client` to the Google Books API.
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            endpoint: google_books::GOOGLE_BOOKS_URL.to_owned(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Overrides the search endpoint.
    ///
    /// An endpoint that is not a valid URL is only detected by [`Catalog::search`], which then
    /// fails with [`ErrorKind::Network`] as no request can be sent.
    #[must_use]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets how many results a search asks for, clamped to the `1..=40` the API accepts.
    #[must_use]
    pub fn max_results(mut self, max_results: u8) -> Self {
        self.max_results = max_results.clamp(1, google_books::MAX_RESULTS_LIMIT);
        self
    }

    /// The client requests are sent with.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Searches the catalog for books matching the free-text `keywords`.
    ///
    /// Exactly one request is made and a failure is returned as is, without retrying.
    ///
    /// # Errors
    ///
    /// An [`Err`] with [`ErrorKind::Network`] is returned when the catalog cannot be reached.
    /// An [`Err`] with [`ErrorKind::Api`] is returned when the catalog answers with a non-success
    /// status.
    /// An [`Err`] with [`ErrorKind::Parse`] is returned when the response is not the expected JSON.
    pub fn search(&self, keywords: &str) -> Result<Vec<Book>, Error> {
        google_books::search_volumes(&self.client, &self.endpoint, keywords, self.max_results)
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, MockClient, NetworkErrorProducer, Producer, REQUESTED_URL,
    REQUEST_COUNT,
};

#[cfg(test)]
mod test {

    use super::*;

    thread_local! {
        pub(crate) static REQUESTED_URL: std::cell::RefCell<Option<String>> = std::cell::RefCell::new(None);
        pub(crate) static REQUEST_COUNT: std::cell::Cell<usize> = std::cell::Cell::new(0);
    }

    /// Asserts the URL of the last request sent through a [`MockClient`] on this thread.
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::REQUESTED_URL.with(|url| url.borrow().clone().unwrap_or_default());
            assert_eq!($expected, url, $($arg)+);
        };
    }

    /// Canned outcome of a [`MockClient`] request: the JSON text or the transport error.
    pub(crate) trait Producer<T>
    where
        Self: Default,
    {
        fn produce() -> Result<T, Error>;
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P: Producer<String> = EmptyTextProducer> {
        _producer: std::marker::PhantomData<P>,
    }

    impl<P: Producer<String>> Client for MockClient<P> {
        fn get_json<T>(&self, url: &str) -> Result<T, Error>
        where
            T: DeserializeOwned,
        {
            REQUESTED_URL.with(|requested| *requested.borrow_mut() = Some(url.to_owned()));
            REQUEST_COUNT.with(|count| count.set(count.get() + 1));
            P::produce().and_then(|json| {
                serde_json::from_str(&json).map_err(|e| Error::wrap(ErrorKind::Parse, e))
            })
        }
    }

    macro_rules! impl_text_producer {
        ($($producer:ident => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<String> for $producer {
                    fn produce() -> Result<String, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_text_producer! {
        EmptyTextProducer => Ok("".to_owned()),
        NetworkErrorProducer => Err(Error::new(ErrorKind::Network, "operation timed out")),
    }

    pub(crate) use assert_url;
    pub(crate) use impl_text_producer;
}
