use super::*;

#[test]
fn buffer_captures_lines() {
    let handler = buffer_handler();
    handler.println("1");
    handler.println("2");
    assert_eq!(handler.output(), "1\n2\n");
}

#[test]
fn take_output_drains_the_buffer() {
    let handler = buffer_handler();
    handler.println("hello");
    assert_eq!(handler.take_output(), "hello\n");
    assert_eq!(handler.output(), "");
}

#[test]
fn silent_discards() {
    let handler = silent_handler();
    handler.println("hello");
    assert_eq!(handler.output(), "");
}

#[test]
fn clones_share_the_buffer() {
    let handler = buffer_handler();
    let other = Arc::clone(&handler);
    let worker = std::thread::spawn(move || {
        for _ in 0..50 {
            other.println("a");
        }
    });
    for _ in 0..50 {
        handler.println("b");
    }
    worker.join().unwrap_or_else(|_| panic!("printer thread panicked"));
    assert_eq!(handler.output().lines().count(), 100);
}
