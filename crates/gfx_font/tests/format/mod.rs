mod bdf;
mod draw;
mod file;
mod header;
mod xml;
mod yaff;
