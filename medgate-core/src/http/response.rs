//! Response helpers

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Request with its body already collected
pub type Req = Request<Bytes>;
pub type Resp = Response<Full<Bytes>>;

/// JSON response from any serializable value
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Resp {
    let payload = serde_json::to_vec(body).unwrap_or_else(|e| {
        log::error!("Failed to serialize response body: {}", e);
        br#"{"error":"Internal server error"}"#.to_vec()
    });

    let mut response = Response::new(Full::new(Bytes::from(payload)));
    *response.status_mut() = status;
    response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub fn ok_json<T: Serialize + ?Sized>(body: &T) -> Resp {
    json_response(StatusCode::OK, body)
}

/// Value of query parameter `name`, percent-decoded
pub fn query_param(req: &Req, name: &str) -> Option<String> {
    req.uri().query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != name {
            return None;
        }
        urlencoding::decode(value).ok().map(|decoded| decoded.into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn request(uri: &str) -> Req {
        Request::builder().uri(uri).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_query_param_decoding() {
        let req = request("/api/permissions/route?path=%2Fadd-patient&x=1");
        assert_eq!(query_param(&req, "path"), Some("/add-patient".to_string()));
        assert_eq!(query_param(&req, "x"), Some("1".to_string()));
        assert_eq!(query_param(&req, "missing"), None);
        assert_eq!(query_param(&request("/no-query"), "path"), None);
    }

    #[tokio::test]
    async fn test_json_response() {
        let resp = json_response(StatusCode::CREATED, &serde_json::json!({"ok": true}));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"ok":true}"#);
    }
}
