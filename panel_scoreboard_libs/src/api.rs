pub trait FieldList {
    fn field_list() -> &'static str;
}
