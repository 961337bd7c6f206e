pub(crate) mod contributors;
