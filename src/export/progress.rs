//! Console lines printed while a collection is exported.

use crate::{
    style::{Style, paint},
    utils,
};

const ARTIST_WIDTH: usize = 26;
const TITLE_WIDTH: usize = 41;

fn counter(number: usize, total: usize) -> String {
    format!("[{}/{}]", number, total)
}

/// `[n/total]  artist  title`, counter in green.
pub fn processing_line(number: usize, total: usize, artist: &str, title: &str) -> String {
    format!(
        "{}{:<28}{:<41}",
        paint(&format!("{:<11}", counter(number, total)), Style::Green),
        utils::truncate(artist, ARTIST_WIDTH),
        utils::truncate(title, TITLE_WIDTH),
    )
}

/// `[n/total]  ...Skipping (message)  title`, all in blue.
pub fn skipping_line(number: usize, total: usize, title: &str, message: &str) -> String {
    let line = format!(
        "{:<11}{:<28.26}{:<41}",
        counter(number, total),
        format!("...Skipping ({})", message),
        utils::truncate(title, TITLE_WIDTH),
    );
    paint(&line, Style::Blue)
}
