use paramparse::prelude::*;

#[derive(Record, Default, Debug, PartialEq)]
struct Tagged<T: Default> {
    #[rule(hex())]
    tag: u32,
    #[skip]
    payload: T,
}

#[derive(Record, Default, Debug, PartialEq)]
struct Empty;

fn main() {
    let (tagged, read) = Tagged::<String>::parse("beef").expect("hex tag");
    assert_eq!((tagged.tag, read), (0xbeef, 4));
    assert_eq!(Empty::parse("anything"), Ok((Empty, 0)));
}
