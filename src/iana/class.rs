//! DNS classes.

//------------ Class ---------------------------------------------------------

int_enum! {
    /// DNS classes accepted for queries.
    ///
    /// Almost all queries are for the Internet class. The remaining values
    /// are rarely useful but the engine accepts them, so
    /// [`Channel::query_with_class`] does, too.
    ///
    /// [`Channel::query_with_class`]: crate::channel::Channel::query_with_class
    =>
    Class, u16;

    /// Internet (IN).
    (IN => 1, "IN")

    /// Chaosnet (CH).
    (CH => 3, "CH")

    /// Hesiod (HS).
    (HS => 4, "HS")

    /// Query class None.
    (NONE => 0xFE, "NONE")

    /// Query class * (ANY).
    (ANY => 0xFF, "*")
}

int_enum_str_with_decimal!(Class, u16);

impl Default for Class {
    fn default() -> Self {
        Class::IN
    }
}

//============ Tests =========================================================
