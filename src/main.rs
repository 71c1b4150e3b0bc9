use leptos::prelude::*;
use line_flow::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
