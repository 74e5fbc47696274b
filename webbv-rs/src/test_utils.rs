#[macro_export]
macro_rules! test_ressource {
    ($fname:expr) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/ressources/tests/", $fname) // assumes Linux ('/')!
    };
}
