use tally::app;
use tally::dom::web;
use tally::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
fn main() {
    let store = CounterStore::new(0);

    web::start(store.store(), app::render(&store));
}
