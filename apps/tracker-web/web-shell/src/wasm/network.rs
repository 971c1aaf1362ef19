use super::*;

    /// `fetch`-backed transport. Statuses pass through untouched; only a
    /// failure to get any response becomes a [`TransportError`].
    pub(super) struct GlooTransport;

    #[async_trait(?Send)]
    impl HttpTransport for GlooTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = match request.method {
                HttpMethod::Get => Request::get(&request.url),
                HttpMethod::Post => Request::post(&request.url),
            };
            builder = builder.header("accept", "application/json");
            if let Some(token) = request.bearer_token.as_deref() {
                builder = builder.header("authorization", &format!("Bearer {token}"));
            }

            let response = match request.body {
                Some(body) => {
                    builder
                        .header("content-type", "application/json")
                        .body(body.to_string())
                        .map_err(map_network_error)?
                        .send()
                        .await
                }
                None => builder.send().await,
            }
            .map_err(map_network_error)?;

            let status = response.status();
            let body = response.text().await.map_err(map_network_error)?;
            Ok(HttpResponse::new(status, body))
        }
    }

    pub(super) fn map_network_error(error: gloo_net::Error) -> TransportError {
        TransportError::new(error.to_string())
    }
