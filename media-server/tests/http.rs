use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use media_server::{build, default_config};
use serde_json::json;
use tower::ServiceExt;

struct Fixture {
    _dir: tempfile::TempDir,
    config: media_core::MediaConfig,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("objects");
    std::fs::create_dir_all(root.join("videos")).unwrap();
    let video: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
    std::fs::write(root.join("videos/intro.mp4"), &video).unwrap();
    std::fs::write(root.join("notes.txt"), b"plain text body").unwrap();

    let manifest = json!({
        "records": [
            {"id": "intro", "key": "videos/intro.mp4", "file_name": "intro.mp4", "content_type": "video/mp4", "size": 1000},
            {"id": "notes", "key": "notes.txt", "file_name": "notes.txt", "content_type": "text/plain"},
            {"id": "lost", "key": "nowhere.bin", "file_name": "lost.bin", "content_type": "application/octet-stream"}
        ]
    });
    let manifest_path = dir.path().join("manifest.json");
    std::fs::write(&manifest_path, manifest.to_string()).unwrap();

    let mut config = default_config();
    config.set("manifest.path", manifest_path.to_string_lossy().to_string());
    config.set("store.root", root.to_string_lossy().to_string());
    Fixture { _dir: dir, config }
}

fn get(uri: &str, range: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(range) = range {
        builder = builder.header("range", range);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_ok() {
    let fx = fixture();
    let ax = build(&fx.config).await.unwrap();

    let res = ax.into_router().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "ok");
}

#[tokio::test]
async fn serves_ranges_from_preloaded_files() {
    let fx = fixture();
    let router = build(&fx.config).await.unwrap().into_router();

    let res = router.clone().oneshot(get("/media/intro", Some("bytes=0-99"))).await.unwrap();
    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(res.headers()["content-range"], "bytes 0-99/1000");
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.len(), 100);

    let res = router.oneshot(get("/media/notes", None)).await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers()["content-disposition"], "attachment; filename=\"notes.txt\"");
    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"plain text body");
}

#[tokio::test]
async fn manifest_entry_without_object_is_502() {
    let fx = fixture();
    let router = build(&fx.config).await.unwrap().into_router();

    let res = router.oneshot(get("/media/lost", None)).await.unwrap();
    assert_eq!(res.status().as_u16(), 502);
}

#[tokio::test]
async fn suffix_ranges_can_be_switched_on() {
    let mut fx = fixture();
    let router = build(&fx.config).await.unwrap().into_router();
    let res = router.oneshot(get("/media/intro", Some("bytes=-10"))).await.unwrap();
    assert_eq!(res.status().as_u16(), 416);

    fx.config.set("delivery.suffix_ranges", "true");
    let router = build(&fx.config).await.unwrap().into_router();
    let res = router.oneshot(get("/media/intro", Some("bytes=-10"))).await.unwrap();
    assert_eq!(res.status().as_u16(), 206);
    assert_eq!(res.headers()["content-range"], "bytes 990-999/1000");
}

#[tokio::test]
async fn cache_lifetime_comes_from_config() {
    let mut fx = fixture();
    fx.config.set("delivery.cache_max_age_secs", "600");
    let router = build(&fx.config).await.unwrap().into_router();

    let res = router.oneshot(get("/media/intro", None)).await.unwrap();
    assert_eq!(res.headers()["cache-control"], "public, max-age=600");
}
