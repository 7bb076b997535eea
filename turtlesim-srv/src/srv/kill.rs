//! `turtlesim/Kill`: remove a turtle by name.

ros_service! {
    Kill,
    md5sum: "c1f3d28f1b044c871e6eff2e9fc3c667",
    request: KillRequest {
        md5sum: "c1f3d28f1b044c871e6eff2e9fc3c667",
        definition: "string name\n",
        fields: {
            name: String,
        },
    },
    response: KillResponse {
        md5sum: "d41d8cd98f00b204e9800998ecf8427e",
        definition: "",
        fields: {},
    },
}
