use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn started(r: ImageRequest) -> LoadTicket {
    match r {
        ImageRequest::Started(t) => t,
        other => panic!("expected a new load, got {other:?}"),
    }
}

#[test]
fn request_complete_then_ready() {
    let mut cache = ImageCache::<&'static str>::new();
    let id = ObjectId(1);
    let t = started(cache.request(id, "a.png"));
    assert!(!cache.has_image(id));
    assert!(cache.is_pending(id));
    assert_eq!(cache.request(id, "a.png"), ImageRequest::InFlight(t));

    assert!(cache.complete(t, "pixels"));
    assert!(cache.has_image(id));
    assert_eq!(cache.get(id), Some(&"pixels"));
    assert_eq!(cache.request(id, "a.png"), ImageRequest::Ready);
}

#[test]
fn new_source_supersedes_old_ticket() {
    let mut cache = ImageCache::<u32>::new();
    let id = ObjectId(2);
    let old = started(cache.request(id, "a.png"));
    let new = started(cache.request(id, "b.png"));
    assert!(!cache.complete(old, 1));
    assert!(!cache.has_image(id));
    assert!(cache.complete(new, 2));
    assert_eq!(cache.get(id), Some(&2));
    // A changed source on a ready image starts a fresh load.
    assert!(matches!(cache.request(id, "c.png"), ImageRequest::Started(_)));
}

#[test]
fn callbacks_fire_on_completion_until_removed() {
    let mut cache = ImageCache::<()>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let cb = cache.on_load(move |id| sink.borrow_mut().push(id));

    let t = started(cache.request(ObjectId(5), "x"));
    cache.complete(t, ());
    assert_eq!(*seen.borrow(), vec![ObjectId(5)]);

    assert!(cache.remove_callback(cb));
    let t = started(cache.request(ObjectId(6), "y"));
    cache.complete(t, ());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn failed_load_leaves_placeholder() {
    let mut cache = ImageCache::<()>::new();
    let t = started(cache.request(ObjectId(3), "broken"));
    cache.fail(t);
    assert!(!cache.is_pending(ObjectId(3)));
    assert!(!cache.has_image(ObjectId(3)));
    assert!(!cache.complete(t, ()));
}

#[test]
fn evict_forgets_image() {
    let mut cache = ImageCache::<u8>::new();
    let t = started(cache.request(ObjectId(9), "z"));
    cache.complete(t, 7);
    assert_eq!(cache.evict(ObjectId(9)), Some(7));
    assert!(!cache.has_image(ObjectId(9)));
}

#[test]
fn id_sets_report_availability() {
    let set: HashSet<ObjectId> = [ObjectId(1)].into_iter().collect();
    assert!(set.has_image(ObjectId(1)));
    assert!(!set.has_image(ObjectId(2)));
}
