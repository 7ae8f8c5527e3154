#![cfg(test)]

mod util;

mod store {
    mod integration;
}

mod sniffing {
    mod integration;
}
