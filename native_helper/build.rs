use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

use std::env;
use std::fs::File;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let dest = env::var("OUT_DIR").unwrap();
    let mut file = File::create(Path::new(&dest).join("egl_bindings.rs")).unwrap();

    Registry::new(Api::Egl, (1, 5), Profile::Core, Fallbacks::All, [])
    .write_bindings(StructGenerator, &mut file)
    .unwrap();
}
