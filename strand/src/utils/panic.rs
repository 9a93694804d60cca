use std::any::Any;

/// Extracts the message carried by a panic payload.
///
/// `panic!` with a literal stores a `&'static str`, formatted panics store
/// a `String`. Anything else is reported as an opaque payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => String::from("non-string panic payload"),
        },
    }
}
