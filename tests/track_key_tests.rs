use playclock::{Error, TrackKey};
use url::Url;

#[test]
fn test_query_order_does_not_matter() {
    let a = TrackKey::parse("https://cdn.example.com/ep.mp3?b=2&a=1").unwrap();
    let b = TrackKey::parse("https://cdn.example.com/ep.mp3?a=1&b=2").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "https://cdn.example.com/ep.mp3?a=1&b=2");
}

#[test]
fn test_scheme_host_and_default_port_are_normalized() {
    let a = TrackKey::parse("HTTPS://CDN.Example.com:443/ep.mp3").unwrap();
    let b = TrackKey::parse("https://cdn.example.com/ep.mp3").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_paths_stay_case_sensitive() {
    let a = TrackKey::parse("https://cdn.example.com/Ep.mp3").unwrap();
    let b = TrackKey::parse("https://cdn.example.com/ep.mp3").unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_file_locators_produce_keys() {
    let url = Url::parse("file:///var/cache/ep.mp3").unwrap();
    assert_eq!(TrackKey::from(&url).as_str(), "file:///var/cache/ep.mp3");
}

#[test]
fn test_malformed_locator_is_rejected() {
    assert!(matches!(
        TrackKey::parse("not a url"),
        Err(Error::InvalidLocator(_))
    ));
}

#[test]
fn test_opaque_keys_are_verbatim() {
    let key = TrackKey::new("track1");
    assert_eq!(key.to_string(), "track1");
    assert_ne!(key, TrackKey::new("track2"));
}
