//! `turtlesim/Spawn`: add a turtle. The response carries the name it was given.

ros_service! {
    Spawn,
    md5sum: "0b2d2e872a8e2887d5ed626f2bf2c561",
    request: SpawnRequest {
        md5sum: "57f001c49ab7b11d699f8606c1f4f7ff",
        definition: "float32 x\nfloat32 y\nfloat32 theta\nstring name # Optional.  A unique name will be created and returned if this is empty\n",
        fields: {
            x: f32,
            y: f32,
            theta: f32,
            /// Empty asks the simulator to pick a unique name.
            name: String,
        },
    },
    response: SpawnResponse {
        md5sum: "c1f3d28f1b044c871e6eff2e9fc3c667",
        definition: "string name\n",
        fields: {
            name: String,
        },
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srv::RosMessage;

    #[test]
    fn test_request_length() {
        let request = SpawnRequest {
            x: 2.0,
            y: 2.0,
            theta: 0.2,
            name: "turtle2".to_string(),
        };
        assert_eq!(request.serialized_length(), 12 + 4 + 7);
        assert_eq!(request.to_bytes().len(), request.serialized_length());
    }

    #[test]
    fn test_default_request_has_empty_name() {
        let bytes = SpawnRequest::default().to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[12..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_response_from_bytes() {
        let bytes = [0x02, 0x00, 0x00, 0x00, b't', b'3'];
        assert_eq!(
            SpawnResponse::from_bytes(&bytes).unwrap(),
            SpawnResponse {
                name: "t3".to_string()
            }
        );
    }
}
