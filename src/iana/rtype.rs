//! Resource record types.

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource record types understood by the channel.
    ///
    /// Each resource record has a 16 bit type value indicating what kind of
    /// information is represented by the record. The channel only submits
    /// queries for the types listed here because each of them has a
    /// decoder producing a canonical result. Other values can still be
    /// represented, for instance when they come from user input, but
    /// [`Channel::query`] rejects them.
    ///
    /// In order to avoid confusion over capitalization, the mnemonics are
    /// treated as single acronyms and therefore all names are spelled
    /// in upper case just like in the registry.
    ///
    /// [`Channel::query`]: crate::channel::Channel::query
    =>
    Rtype, u16;

    /// A host address.
    (A => 1, "A")

    /// An authoritative name server.
    (NS => 2, "NS")

    /// The canonical name for an alias.
    (CNAME => 5, "CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, "SOA")

    /// A domain name pointer.
    (PTR => 12, "PTR")

    /// Mail exchange.
    (MX => 15, "MX")

    /// Text strings.
    (TXT => 16, "TXT")

    /// IPv6 address.
    (AAAA => 28, "AAAA")

    /// Server selection.
    (SRV => 33, "SRV")

    /// Naming authority pointer.
    (NAPTR => 35, "NAPTR")
}

int_enum_str_with_decimal!(Rtype, u16);

impl Rtype {
    /// Returns whether the reply to this type is a list of records.
    ///
    /// CNAME, PTR, and SOA replies produce a single record. All other
    /// supported types produce a list in the order the engine decoded them.
    #[must_use]
    pub fn is_list(self) -> bool {
        !matches!(self, Rtype::CNAME | Rtype::PTR | Rtype::SOA)
    }
}

//============ Tests =========================================================
